use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 是否输出嵌套阶段的耗时（`WEEKLY_DISPATCH_PERF_NESTED=1`）
fn nested_enabled() -> bool {
    std::env::var("WEEKLY_DISPATCH_PERF_NESTED")
        .map(|v| is_true(&v))
        .unwrap_or(cfg!(debug_assertions))
}

/// 性能统计 Guard：drop 时记录 elapsed_ms 与嵌套深度
///
/// 使用方式：
/// ```ignore
/// let _perf = weekly_dispatch::perf::PerfGuard::new("week_run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let current = d.get();
            d.set(current.saturating_add(1));
            current
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        if self.depth == 0 || nested_enabled() {
            tracing::info!(
                target: "perf",
                op = self.op,
                depth = self.depth,
                elapsed_ms,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
