mod tests {
    use ledwire::color::{
        BLACK, Palette4, Rgb, WHITE, add_colors, blend_colors, fade_to_black_by, rgb_from_u32,
        rgb_to_u32,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(
            blend_colors(RED, BLUE, 128),
            Rgb {
                r: 127,
                g: 0,
                b: 128
            }
        );
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
        assert_eq!(blend_colors(WHITE, BLACK, 0), WHITE);
    }

    #[test]
    fn test_packed_colors() {
        assert_eq!(rgb_from_u32(0x00FF_8001), Rgb::new(255, 128, 1));
        assert_eq!(rgb_to_u32(Rgb::new(255, 128, 1)), 0x00FF_8001);
    }

    #[test]
    fn test_fade_and_add() {
        assert_eq!(fade_to_black_by(WHITE, 0), WHITE);
        assert_eq!(fade_to_black_by(WHITE, 255), BLACK);
        assert_eq!(
            add_colors(Rgb::new(200, 10, 0), Rgb::new(100, 10, 5)),
            Rgb::new(255, 20, 5)
        );
    }

    #[test]
    fn test_palette_endpoints() {
        let palette = Palette4::new([BLACK, RED, BLUE, WHITE]);
        assert_eq!(palette.sample(0), BLACK);
        assert_eq!(palette.sample(85), RED);
        assert_eq!(palette.sample(170), BLUE);
        assert_eq!(palette.sample(255), WHITE);
    }
}
