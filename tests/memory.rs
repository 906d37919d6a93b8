mod tests {
    use std::cell::Cell;
    use std::ops::{Deref, DerefMut};
    use std::rc::Rc;

    use myrtio_strip_controller::color::{BLACK, Rgb};
    use myrtio_strip_controller::memory::FrameBuffers;
    use myrtio_strip_controller::{Error, HeapPool, MemoryRegion, NoPool, PixelPool};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    /// Buffer that reports its lifetime to the owning pool
    struct TrackedBuffer {
        pixels: Vec<Rgb>,
        live: Rc<Cell<usize>>,
    }

    impl Deref for TrackedBuffer {
        type Target = [Rgb];

        fn deref(&self) -> &[Rgb] {
            &self.pixels
        }
    }

    impl DerefMut for TrackedBuffer {
        fn deref_mut(&mut self) -> &mut [Rgb] {
            &mut self.pixels
        }
    }

    impl Drop for TrackedBuffer {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    /// Pool that serves a fixed number of buffers and counts live ones
    struct LimitedPool {
        remaining: usize,
        live: Rc<Cell<usize>>,
    }

    impl LimitedPool {
        fn new(remaining: usize) -> Self {
            Self {
                remaining,
                live: Rc::new(Cell::new(0)),
            }
        }
    }

    impl PixelPool for LimitedPool {
        type Buffer = TrackedBuffer;

        fn allocate(&mut self, len: usize) -> Option<TrackedBuffer> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            self.live.set(self.live.get() + 1);
            // Dirty memory, as a real pool would hand out
            Some(TrackedBuffer {
                pixels: vec![RED; len],
                live: Rc::clone(&self.live),
            })
        }
    }

    #[test]
    fn test_heap_pool_allocates_black() {
        let buffer = HeapPool.allocate(16).unwrap();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|pixel| *pixel == BLACK));
        assert!(NoPool.allocate(16).is_none());
    }

    #[test]
    fn test_buffers_are_cleared() {
        let mut large = LimitedPool::new(2);
        let buffers =
            FrameBuffers::allocate(&mut large, &mut HeapPool, 8, true, true).unwrap();
        assert!(buffers.front().iter().all(|pixel| *pixel == BLACK));
        assert!(buffers.back().iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_prefers_large_pool() {
        let mut large = LimitedPool::new(2);
        let buffers =
            FrameBuffers::allocate(&mut large, &mut HeapPool, 8, true, true).unwrap();
        assert_eq!(buffers.regions(), (MemoryRegion::Large, MemoryRegion::Large));
        assert_eq!(large.live.get(), 2);
    }

    #[test]
    fn test_falls_back_per_buffer() {
        let mut large = LimitedPool::new(1);
        let buffers =
            FrameBuffers::allocate(&mut large, &mut HeapPool, 8, true, true).unwrap();
        assert_eq!(
            buffers.regions(),
            (MemoryRegion::Large, MemoryRegion::General)
        );
    }

    #[test]
    fn test_large_pool_skipped_when_not_preferred() {
        let mut large = LimitedPool::new(2);
        let buffers =
            FrameBuffers::allocate(&mut large, &mut HeapPool, 8, false, false).unwrap();
        assert_eq!(
            buffers.regions(),
            (MemoryRegion::General, MemoryRegion::General)
        );
        assert_eq!(large.live.get(), 0);
    }

    #[test]
    fn test_failed_double_buffer_releases_first() {
        let mut general = LimitedPool::new(1);
        let result = FrameBuffers::allocate(&mut NoPool, &mut general, 8, true, true);
        assert!(matches!(result, Err(Error::AllocationFailure)));
        assert_eq!(general.live.get(), 0);
    }

    #[test]
    fn test_drop_releases_buffers() {
        let mut general = LimitedPool::new(2);
        let buffers =
            FrameBuffers::allocate(&mut NoPool, &mut general, 8, false, true).unwrap();
        assert_eq!(general.live.get(), 2);
        drop(buffers);
        assert_eq!(general.live.get(), 0);
    }

    #[test]
    fn test_swap_exchanges_roles() {
        let mut buffers =
            FrameBuffers::<NoPool, HeapPool>::allocate(&mut NoPool, &mut HeapPool, 4, false, true)
                .unwrap();
        assert!(buffers.is_double_buffered());

        buffers.back_mut()[0] = RED;
        assert_eq!(buffers.front()[0], BLACK);

        assert!(buffers.swap());
        assert_eq!(buffers.front()[0], RED);
        assert_eq!(buffers.back()[0], BLACK);

        assert!(buffers.swap());
        assert_eq!(buffers.front()[0], BLACK);
        assert_eq!(buffers.back()[0], RED);
    }

    #[test]
    fn test_single_buffer_shares_memory() {
        let mut buffers =
            FrameBuffers::<NoPool, HeapPool>::allocate(&mut NoPool, &mut HeapPool, 4, false, false)
                .unwrap();
        assert!(!buffers.is_double_buffered());

        buffers.back_mut()[2] = RED;
        assert_eq!(buffers.front()[2], RED);
        assert!(!buffers.swap());
        assert_eq!(buffers.front()[2], RED);
    }

    #[test]
    fn test_bytes() {
        let single =
            FrameBuffers::<NoPool, HeapPool>::allocate(&mut NoPool, &mut HeapPool, 10, false, false)
                .unwrap();
        let double =
            FrameBuffers::<NoPool, HeapPool>::allocate(&mut NoPool, &mut HeapPool, 10, false, true)
                .unwrap();
        assert_eq!(single.bytes(), 30);
        assert_eq!(double.bytes(), 60);
    }
}
