mod tests {
    use myrtio_strip_controller::layout::{MAX_STRIPS, MAX_TOTAL_PIXELS};
    use myrtio_strip_controller::{Error, OutputId, StripLayout};

    const OUTPUTS: [OutputId; 4] = [OutputId(4), OutputId(5), OutputId(18), OutputId(19)];

    fn sphere() -> StripLayout {
        StripLayout::new(&[180, 220, 180, 220], &OUTPUTS, &[]).unwrap()
    }

    #[test]
    fn test_total_and_ranges() {
        let layout = sphere();
        assert_eq!(layout.total_pixels(), 800);
        assert_eq!(layout.strip_count(), 4);
        assert_eq!(layout.range(0), Some(0..180));
        assert_eq!(layout.range(1), Some(180..400));
        assert_eq!(layout.range(3), Some(580..800));
        assert_eq!(layout.range(4), None);
        assert_eq!(layout.longest_strip(), 220);
        assert_eq!(layout.strip(2).map(|strip| strip.output), Some(OutputId(18)));
    }

    #[test]
    fn test_locate() {
        let layout = sphere();
        assert_eq!(layout.locate(0), Some((0, 0)));
        assert_eq!(layout.locate(179), Some((0, 179)));
        assert_eq!(layout.locate(180), Some((1, 0)));
        assert_eq!(layout.locate(799), Some((3, 219)));
        assert_eq!(layout.locate(800), None);
    }

    #[test]
    fn test_flat_index() {
        let layout = sphere();
        assert_eq!(layout.flat_index(0, 0), Some(0));
        assert_eq!(layout.flat_index(1, 0), Some(180));
        assert_eq!(layout.flat_index(3, 219), Some(799));
        assert_eq!(layout.flat_index(1, 220), None);
        assert_eq!(layout.flat_index(0, 180), None);
        assert_eq!(layout.flat_index(4, 0), None);
    }

    #[test]
    fn test_locate_and_flat_index_agree() {
        let layout = sphere();
        for flat in 0..layout.total_pixels() {
            let (strip, local) = layout.locate(flat).unwrap();
            assert_eq!(layout.flat_index(strip, local), Some(flat));
        }
    }

    #[test]
    fn test_empty_strip_is_skipped() {
        let layout = StripLayout::new(&[10, 0, 10], &OUTPUTS[..3], &[]).unwrap();
        assert_eq!(layout.total_pixels(), 20);
        assert_eq!(layout.range(1), Some(10..10));
        assert_eq!(layout.locate(10), Some((2, 0)));
        assert_eq!(layout.flat_index(1, 0), None);
    }

    #[test]
    fn test_offsets() {
        let offsets = [[0, 0, 0], [10, 0, 0], [0, -10, 5], [1, 2, 3]];
        let layout = StripLayout::new(&[1, 1, 1, 1], &OUTPUTS, &offsets).unwrap();
        assert_eq!(layout.strip(2).map(|strip| strip.offset), Some([0, -10, 5]));

        let layout = sphere();
        assert!(layout.strips().iter().all(|strip| strip.offset == [0, 0, 0]));
    }

    #[test]
    fn test_invalid_layouts() {
        assert_eq!(StripLayout::new(&[], &[], &[]), Err(Error::InvalidParameter));
        assert_eq!(
            StripLayout::new(&[0, 0], &OUTPUTS[..2], &[]),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            StripLayout::new(&[10, 10], &OUTPUTS[..1], &[]),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            StripLayout::new(&[10, 10], &OUTPUTS[..2], &[[0, 0, 0]]),
            Err(Error::InvalidParameter)
        );

        let too_many = [1u16; MAX_STRIPS + 1];
        let outputs = [OutputId(0); MAX_STRIPS + 1];
        assert_eq!(
            StripLayout::new(&too_many, &outputs, &[]),
            Err(Error::InvalidParameter)
        );
    }

    #[test]
    fn test_total_pixel_cap() {
        let half = (MAX_TOTAL_PIXELS / 2) as u16;
        assert!(StripLayout::new(&[half, half], &OUTPUTS[..2], &[]).is_ok());
        assert_eq!(
            StripLayout::new(&[half, half + 1], &OUTPUTS[..2], &[]),
            Err(Error::InvalidParameter)
        );
    }
}
