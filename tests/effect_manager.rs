mod tests {
    use embassy_time::{Duration, Instant};
    use ledwire::color::{BLACK, Rgb, WHITE};
    use ledwire::effect::{ColorFillEffect, PaletteFlameEffect, RainbowEffect, VuMeterEffect};
    use ledwire::{
        AudioPeaks, EffectManager, EffectManagerConfig, EffectSlot, FrameContext, IndexError,
        InitError, LedSurface,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    type Manager = EffectManager<LedSurface<4>, 1>;

    fn fill(name: &str, color: Rgb) -> EffectSlot {
        EffectSlot::ColorFill(ColorFillEffect::new(color)).with_name(name)
    }

    fn config() -> EffectManagerConfig {
        EffectManagerConfig {
            rotation_interval: Duration::from_millis(10_000),
            crossfade: Duration::from_millis(1_000),
            ..EffectManagerConfig::default()
        }
    }

    fn manager(count: usize) -> Manager {
        let names = ["A", "B", "C", "D", "E"];
        let effects = names[..count].iter().map(|name| fill(name, RED));
        EffectManager::new([LedSurface::new()], effects, &config()).unwrap()
    }

    fn draw(manager: &mut Manager, at: u64) {
        let peaks = AudioPeaks::new();
        manager.draw(&FrameContext {
            now: Instant::from_millis(at),
            peaks: &peaks,
        });
    }

    fn pixels(manager: &Manager) -> Vec<Rgb> {
        manager.surfaces()[0].leds().to_vec()
    }

    #[test]
    fn test_full_lap_returns_to_start() {
        let mut manager = manager(5);
        manager.select_effect(2).unwrap();

        for _ in 0..5 {
            manager.next_effect();
        }
        assert_eq!(manager.current_index(), 2);

        for _ in 0..5 {
            manager.previous_effect();
        }
        assert_eq!(manager.current_index(), 2);
    }

    #[test]
    fn test_previous_wraps_around() {
        let mut manager = manager(4);
        manager.previous_effect();
        assert_eq!(manager.current_index(), 3);
        assert_eq!(manager.current_effect_name(), "D");
    }

    #[test]
    fn test_disabled_entries_are_skipped() {
        let mut manager = manager(4);
        manager.disable(1).unwrap();
        manager.disable(2).unwrap();

        let mut visited = Vec::new();
        for _ in 0..6 {
            manager.next_effect();
            visited.push(manager.current_index());
        }
        assert_eq!(visited, [3, 0, 3, 0, 3, 0]);

        manager.previous_effect();
        assert_eq!(manager.current_index(), 3);
    }

    #[test]
    fn test_play_all_visits_disabled_entries() {
        let mut manager = manager(3);
        manager.disable(1).unwrap();
        manager.set_play_all(true);
        assert!(manager.play_all());

        manager.next_effect();
        assert_eq!(manager.current_index(), 1);
    }

    #[test]
    fn test_index_errors_leave_state_untouched() {
        let mut manager = manager(3);
        let error = IndexError { index: 5, count: 3 };

        assert_eq!(manager.enable(5), Err(error));
        assert_eq!(manager.disable(5), Err(error));
        assert_eq!(manager.select_effect(5), Err(error));
        assert_eq!(manager.enabled_count(), 3);
        assert_eq!(manager.current_index(), 0);
        assert!(!manager.is_enabled(5));
    }

    #[test]
    fn test_enable_and_disable_are_idempotent() {
        let mut manager = manager(3);
        manager.disable(1).unwrap();
        manager.disable(1).unwrap();
        assert_eq!(manager.enabled_count(), 2);

        manager.enable(1).unwrap();
        manager.enable(1).unwrap();
        assert_eq!(manager.enabled_count(), 3);
    }

    #[test]
    fn test_disabling_everything_shows_black() {
        let mut manager = manager(3);
        manager.select_effect(1).unwrap();
        draw(&mut manager, 0);
        assert_eq!(pixels(&manager), [RED; 4]);

        for index in 0..3 {
            manager.disable(index).unwrap();
        }
        assert_eq!(manager.enabled_count(), 0);
        assert!(manager.has_override());
        assert_eq!(manager.current_effect_name(), "Color Fill");
        assert_eq!(manager.current_index(), 1);

        draw(&mut manager, 20);
        assert_eq!(pixels(&manager), [BLACK; 4]);

        manager.enable(2).unwrap();
        assert!(!manager.has_override());
        assert_eq!(manager.current_effect_name(), "B");
    }

    #[test]
    fn test_navigation_moves_one_step_with_nothing_enabled() {
        let mut manager = manager(3);
        for index in 0..3 {
            manager.disable(index).unwrap();
        }
        assert!(!manager.play_all());

        manager.next_effect();
        assert_eq!(manager.current_index(), 1);

        manager.previous_effect();
        manager.previous_effect();
        assert_eq!(manager.current_index(), 2);
        assert!(manager.has_override());
        assert_eq!(manager.current_effect_name(), "Color Fill");
    }

    #[test]
    fn test_clearing_override_restarts_rotation_run() {
        let mut manager = manager(3);
        manager.tick(Instant::from_millis(0));

        manager.set_global_color_override(BLUE).unwrap();
        manager.tick(Instant::from_millis(5_000));
        assert_eq!(
            manager.time_used(Instant::from_millis(6_000)),
            Duration::from_millis(1_000)
        );

        manager.clear_global_color_override();
        assert_eq!(
            manager.time_used(Instant::from_millis(7_000)),
            Duration::from_millis(0)
        );

        manager.tick(Instant::from_millis(7_000));
        assert_eq!(
            manager.time_used(Instant::from_millis(7_500)),
            Duration::from_millis(500)
        );
        assert_eq!(manager.current_index(), 0);
        assert_eq!(manager.current_effect_name(), "A");
    }

    #[test]
    fn test_override_does_not_move_selection() {
        let mut manager = manager(3);
        manager.select_effect(1).unwrap();

        manager.set_global_color_override(BLUE).unwrap();
        assert!(manager.has_override());
        assert_eq!(manager.current_index(), 1);
        assert_eq!(manager.current_effect_name(), "Custom Fire");

        manager.next_effect();
        assert_eq!(manager.current_index(), 2);
        assert!(manager.has_override());

        manager.clear_global_color_override();
        assert_eq!(manager.current_effect_name(), "C");
    }

    #[test]
    fn test_override_blends_towards_previous_color() {
        let mut manager = manager(2);
        manager.set_global_color_override(BLUE).unwrap();
        manager.set_global_color_override(GREEN).unwrap();

        let EffectSlot::PaletteFlame(flame) = manager.active_effect() else {
            panic!("expected a flame override");
        };
        assert_eq!(flame.color(), GREEN);
        assert_eq!(flame.secondary(), Some(BLUE));
    }

    #[test]
    fn test_white_override_is_plain_fill() {
        let mut manager = manager(2);
        manager.set_global_color_override(WHITE).unwrap();
        draw(&mut manager, 0);
        assert_eq!(pixels(&manager), [WHITE; 4]);
    }

    #[test]
    fn test_rejected_override_keeps_previous_state() {
        let effects = [EffectSlot::ColorFill(ColorFillEffect::new(RED))];
        let mut manager: EffectManager<LedSurface<600>, 1> =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();

        manager.set_global_color_override(WHITE).unwrap();
        assert_eq!(
            manager.set_global_color_override(BLUE),
            Err(InitError::TooManyLeds {
                count: 600,
                max: 512
            })
        );
        assert!(manager.has_override());
        assert!(matches!(manager.active_effect(), EffectSlot::ColorFill(effect) if effect.color() == WHITE));
    }

    #[test]
    fn test_effects_failing_init_are_disabled() {
        let effects = [
            EffectSlot::ColorFill(ColorFillEffect::new(RED)),
            EffectSlot::PaletteFlame(PaletteFlameEffect::new(RED, None)),
        ];
        let manager: EffectManager<LedSurface<600>, 1> =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();

        assert_eq!(manager.effect_count(), 2);
        assert!(manager.is_enabled(0));
        assert!(!manager.is_enabled(1));
        assert_eq!(manager.enabled_count(), 1);
    }

    #[test]
    fn test_nothing_initializes_shows_black() {
        let effects = [EffectSlot::PaletteFlame(PaletteFlameEffect::new(RED, None))];
        let manager: EffectManager<LedSurface<600>, 1> =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();

        assert_eq!(manager.enabled_count(), 0);
        assert!(manager.has_override());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result: Result<Manager, _> =
            EffectManager::new([LedSurface::new()], [], &config());
        assert!(matches!(result, Err(ledwire::ConfigError::EmptyCatalog)));
    }

    #[test]
    fn test_rotation_after_interval() {
        let mut manager = manager(3);
        manager.tick(Instant::from_millis(0));

        manager.tick(Instant::from_millis(9_999));
        assert_eq!(manager.current_index(), 0);
        assert_eq!(
            manager.time_remaining(Instant::from_millis(9_999)),
            Some(Duration::from_millis(1))
        );

        manager.tick(Instant::from_millis(10_000));
        assert_eq!(manager.current_index(), 1);
        assert_eq!(
            manager.time_used(Instant::from_millis(10_000)),
            Duration::from_millis(0)
        );
    }

    #[test]
    fn test_effect_time_caps_interval() {
        let effects = [
            fill("Short", RED).with_max_effect_time(Duration::from_millis(2_000)),
            fill("Long", BLUE).with_max_effect_time(Duration::from_millis(60_000)),
        ];
        let mut manager: Manager =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();

        assert_eq!(
            manager.effective_interval(),
            Some(Duration::from_millis(2_000))
        );
        manager.tick(Instant::from_millis(0));
        manager.tick(Instant::from_millis(1_999));
        assert_eq!(manager.current_index(), 0);
        manager.tick(Instant::from_millis(2_000));
        assert_eq!(manager.current_index(), 1);

        assert_eq!(
            manager.effective_interval(),
            Some(Duration::from_millis(10_000))
        );
    }

    #[test]
    fn test_zero_interval_disables_rotation() {
        let mut manager = manager(3);
        manager.set_rotation_interval(Duration::from_millis(0));

        manager.tick(Instant::from_millis(0));
        manager.tick(Instant::from_millis(1_000_000));
        assert_eq!(manager.current_index(), 0);
        assert_eq!(manager.effective_interval(), None);
        assert_eq!(manager.time_remaining(Instant::from_millis(5)), None);
    }

    #[test]
    fn test_draw_uses_current_entry() {
        let effects = [fill("Red", RED), fill("Blue", BLUE)];
        let mut manager: Manager =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();

        draw(&mut manager, 0);
        assert_eq!(pixels(&manager), [RED; 4]);

        manager.next_effect();
        draw(&mut manager, 10);
        assert_eq!(pixels(&manager), [BLUE; 4]);
    }

    #[test]
    fn test_rainbow_spreads_hues_across_surface() {
        let effects = [EffectSlot::Rainbow(RainbowEffect::default())];
        let mut manager: Manager =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();
        draw(&mut manager, 0);

        let leds = pixels(&manager);
        assert!(leds.iter().all(|pixel| *pixel != BLACK));
        assert_ne!(leds[0], leds[2]);
    }

    #[test]
    fn test_hiding_vu_clears_primary_surface() {
        let effects = [
            fill("Red", RED),
            EffectSlot::VuMeter(VuMeterEffect::default()),
        ];
        let mut manager: Manager =
            EffectManager::new([LedSurface::new()], effects, &config()).unwrap();
        draw(&mut manager, 0);

        assert!(manager.is_vu_visible());
        assert!(manager.show_vu(false));
        assert!(!manager.is_vu_visible());
        assert_eq!(pixels(&manager), [BLACK; 4]);

        assert!(!manager.show_vu(true));
        manager.next_effect();
        assert!(!manager.is_vu_visible());
    }

    #[test]
    fn test_failed_reload_keeps_catalog() {
        let mut manager = manager(3);
        manager.select_effect(2).unwrap();

        assert!(manager.load_catalog_from_config(b"{}").is_err());
        assert_eq!(manager.effect_count(), 3);
        assert_eq!(manager.current_index(), 2);
    }
}
