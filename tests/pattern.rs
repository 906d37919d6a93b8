mod tests {
    use myrtio_strip_controller::color::{BLACK, Rgb, is_black};
    use myrtio_strip_controller::pattern::{STRIP_PALETTE, fill_gradient};
    use myrtio_strip_controller::{OutputId, StripLayout, TestPattern};

    const ORANGE: Rgb = Rgb {
        r: 255,
        g: 128,
        b: 0,
    };

    fn layout() -> StripLayout {
        StripLayout::new(&[4, 6], &[OutputId(16), OutputId(17)], &[]).unwrap()
    }

    #[test]
    fn test_pattern_names_round_trip() {
        for pattern in TestPattern::ALL {
            assert_eq!(TestPattern::parse_from_str(pattern.as_str()), Some(pattern));
        }
        assert_eq!(
            TestPattern::parse_from_str("knight_rider"),
            Some(TestPattern::KnightRider)
        );
        assert_eq!(TestPattern::parse_from_str("sparkle"), None);
    }

    #[test]
    fn test_pattern_from_raw() {
        for (id, pattern) in TestPattern::ALL.iter().enumerate() {
            assert_eq!(TestPattern::from_raw(id as u8), Some(*pattern));
            assert_eq!(*pattern as u8, id as u8);
        }
        assert_eq!(TestPattern::from_raw(8), None);
    }

    #[test]
    fn test_solid_fills_layout() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::Solid.render(&mut leds, &layout, ORANGE, 0);
        assert!(leds.iter().all(|led| *led == ORANGE));
    }

    #[test]
    fn test_render_leaves_pixels_past_layout() {
        let layout = layout();
        let mut leds = [BLACK; 12];
        TestPattern::Solid.render(&mut leds, &layout, ORANGE, 0);
        assert_eq!(leds[9], ORANGE);
        assert_eq!(leds[10], BLACK);
        assert_eq!(leds[11], BLACK);
    }

    #[test]
    fn test_strip_identify_uses_palette() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::StripIdentify.render(&mut leds, &layout, ORANGE, 0);
        assert!(leds[..4].iter().all(|led| *led == STRIP_PALETTE[0]));
        assert!(leds[4..].iter().all(|led| *led == STRIP_PALETTE[1]));
    }

    #[test]
    fn test_moving_dot_one_per_strip() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::MovingDot.render(&mut leds, &layout, ORANGE, 5);

        // Strip 0 wraps at 4 pixels, strip 1 at 6
        let lit: Vec<usize> = leds
            .iter()
            .enumerate()
            .filter(|(_, led)| !is_black(**led))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![1, 9]);
        assert_eq!(leds[1], Rgb::new(128, 0, 0));
    }

    #[test]
    fn test_strobe_toggles() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::Strobe.render(&mut leds, &layout, ORANGE, 0);
        assert_eq!(leds[0], ORANGE);
        TestPattern::Strobe.render(&mut leds, &layout, ORANGE, 8);
        assert_eq!(leds[0], BLACK);
        TestPattern::Strobe.render(&mut leds, &layout, ORANGE, 16);
        assert_eq!(leds[0], ORANGE);
    }

    #[test]
    fn test_breathing_starts_dark() {
        let layout = layout();
        let mut leds = [ORANGE; 10];
        TestPattern::Breathing.render(&mut leds, &layout, ORANGE, 0);
        assert!(leds.iter().all(|led| is_black(*led)));
        TestPattern::Breathing.render(&mut leds, &layout, ORANGE, 64);
        assert!(!is_black(leds[0]));
    }

    #[test]
    fn test_gradient_fades_each_strip() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::Gradient.render(&mut leds, &layout, ORANGE, 0);
        assert_eq!(leds[0], ORANGE);
        assert_eq!(leds[3], BLACK);
        assert_eq!(leds[4], ORANGE);
        assert_eq!(leds[9], BLACK);
    }

    #[test]
    fn test_knight_rider_head() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::KnightRider.render(&mut leds, &layout, ORANGE, 0);
        assert_eq!(leds[0], ORANGE);
        assert!(leds[1].r < ORANGE.r);
        assert_eq!(leds[9], BLACK);
    }

    #[test]
    fn test_rainbow_lights_everything() {
        let layout = layout();
        let mut leds = [BLACK; 10];
        TestPattern::Rainbow.render(&mut leds, &layout, ORANGE, 0);
        assert!(leds.iter().all(|led| !is_black(*led)));
        assert_ne!(leds[0], leds[5]);
    }

    #[test]
    fn test_fill_gradient_between_two_colors() {
        let blue = Rgb::new(0, 0, 255);
        let mut leds = [BLACK; 5];
        fill_gradient(&mut leds, ORANGE, blue);
        assert_eq!(leds[0], ORANGE);
        assert_eq!(leds[4], blue);
        assert!(leds[2].b > 0 && leds[2].r > 0);
        assert!(leds[1].r > leds[3].r);

        let mut single = [BLACK; 1];
        fill_gradient(&mut single, ORANGE, blue);
        assert_eq!(single[0], ORANGE);
    }
}
