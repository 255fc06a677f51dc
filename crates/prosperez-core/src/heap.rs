//! Heap accounting via a counting global allocator.
//!
//! The binary installs [`CountingAllocator`] as `#[global_allocator]`;
//! [`usage`] then reports live bytes and the high-water mark. Without the
//! allocator installed both counters stay at zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

const MIB: f64 = 1024.0 * 1024.0;

/// System allocator wrapper that tracks live and peak heap bytes.
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            record_alloc(new_size);
        }
        new_ptr
    }
}

fn record_alloc(size: usize) {
    let now = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
    PEAK.fetch_max(now, Ordering::Relaxed);
}

/// Snapshot of heap usage in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapUsage {
    /// Bytes currently allocated.
    pub used: usize,
    /// High-water mark of allocated bytes.
    pub total: usize,
}

impl HeapUsage {
    pub fn used_mb(&self) -> f64 {
        self.used as f64 / MIB
    }

    pub fn total_mb(&self) -> f64 {
        self.total as f64 / MIB
    }

    /// Used/total as a rounded percentage (0 when nothing is tracked).
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.used as f64 / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Fixed-width gauge, e.g. `████░░░░░░` for 40%.
    pub fn bar(&self, cells: usize) -> String {
        let filled = (self.percent() as usize * cells + 50) / 100;
        let filled = filled.min(cells);
        let mut out = String::with_capacity(cells * 3);
        out.extend(std::iter::repeat('█').take(filled));
        out.extend(std::iter::repeat('░').take(cells - filled));
        out
    }
}

/// Current heap usage.
pub fn usage() -> HeapUsage {
    let used = ALLOCATED.load(Ordering::Relaxed);
    let peak = PEAK.load(Ordering::Relaxed);
    HeapUsage {
        used,
        total: peak.max(used),
    }
}
