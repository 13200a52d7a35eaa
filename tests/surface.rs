mod tests {
    use ledwire::color::{BLACK, Rgb};
    use ledwire::{LedSurface, Surface};

    #[test]
    fn test_fractional_span_dims_boundary_pixels() {
        let mut surface: LedSurface<8> = LedSurface::new();
        surface.set_pixels_fractional(3.25, 1.5, Rgb::new(200, 100, 0), false);

        assert_eq!(surface.get_pixel(2), Some(BLACK));
        assert_eq!(surface.get_pixel(3), Some(Rgb::new(150, 75, 0)));
        assert_eq!(surface.get_pixel(4), Some(Rgb::new(150, 75, 0)));
        assert_eq!(surface.get_pixel(5), Some(BLACK));
    }

    #[test]
    fn test_whole_pixels_are_full_brightness() {
        let mut surface: LedSurface<8> = LedSurface::new();
        surface.set_pixels_fractional(2.0, 3.0, Rgb::new(10, 20, 30), false);

        let lit: Vec<_> = surface.leds().iter().map(|pixel| *pixel != BLACK).collect();
        assert_eq!(lit, [false, false, true, true, true, false, false, false]);
        assert_eq!(surface.get_pixel(3), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn test_merge_adds_to_existing_pixels() {
        let mut surface: LedSurface<4> = LedSurface::new();
        surface.fill(Rgb::new(100, 0, 0));
        surface.set_pixels_fractional(0.0, 2.0, Rgb::new(200, 10, 0), true);

        assert_eq!(surface.get_pixel(0), Some(Rgb::new(255, 10, 0)));
        assert_eq!(surface.get_pixel(1), Some(Rgb::new(255, 10, 0)));
        assert_eq!(surface.get_pixel(2), Some(Rgb::new(100, 0, 0)));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut surface: LedSurface<4> = LedSurface::new();
        surface.set_pixel(9, Rgb::new(1, 1, 1));
        surface.set_pixels_fractional(3.0, 4.0, Rgb::new(1, 1, 1), false);
        surface.set_pixels_fractional(-2.0, 1.0, Rgb::new(9, 9, 9), false);

        assert_eq!(surface.get_pixel(3), Some(Rgb::new(1, 1, 1)));
        assert_eq!(surface.get_pixel(0), Some(BLACK));
        assert_eq!(surface.get_pixel(9), None);
    }

    #[test]
    fn test_huge_span_is_clamped_to_surface() {
        let mut surface: LedSurface<8> = LedSurface::new();
        surface.set_pixels_fractional(0.0, 1.0e9, Rgb::new(255, 255, 255), false);
        assert!(surface.leds().iter().all(|pixel| *pixel == Rgb::new(255, 255, 255)));

        surface.clear();
        surface.set_pixels_fractional(-1.0e9, 2.0e9, Rgb::new(7, 7, 7), false);
        assert!(surface.leds().iter().all(|pixel| *pixel == Rgb::new(7, 7, 7)));
    }

    #[test]
    fn test_clear() {
        let mut surface: LedSurface<4> = LedSurface::new();
        surface.fill(Rgb::new(5, 5, 5));
        surface.clear();
        assert!(surface.leds().iter().all(|pixel| *pixel == BLACK));
    }
}
