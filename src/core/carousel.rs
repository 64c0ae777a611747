use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_CAROUSEL_TOTAL: usize = 6;
pub const DEFAULT_AUTOPLAY_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    total: usize,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(DEFAULT_CAROUSEL_TOTAL)
    }
}

impl Carousel {
    /// `total` 至少為 1
    pub fn new(total: usize) -> Self {
        Self {
            index: 0,
            total: total.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.total;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.total - 1) % self.total;
        self.index
    }

    /// 超出範圍的索引不會改變狀態
    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if index >= self.total {
            return None;
        }
        self.index = index;
        Some(self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Reset,
}

/// 輪播自動播放的排程工作，可暫停、重設與取消
pub struct CarouselAutoplay {
    control: mpsc::UnboundedSender<Control>,
    task: JoinHandle<()>,
}

impl CarouselAutoplay {
    /// 以 `advance` 存取輪播狀態，每個週期前進一格
    pub fn start<F>(period: Duration, advance: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (control, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            let mut paused = false;

            loop {
                tokio::select! {
                    _ = ticker.tick(), if !paused => advance(),
                    message = rx.recv() => match message {
                        Some(Control::Pause) => paused = true,
                        Some(Control::Resume) => {
                            paused = false;
                            ticker.reset();
                        }
                        Some(Control::Reset) => ticker.reset(),
                        None => break,
                    },
                }
            }
            tracing::debug!("Carousel autoplay stopped");
        });

        Self { control, task }
    }

    /// 指標移入時暫停
    pub fn pause(&self) {
        let _ = self.control.send(Control::Pause);
    }

    /// 指標移出時恢復，並重新計算週期
    pub fn resume(&self) {
        let _ = self.control.send(Control::Resume);
    }

    /// 手動切換後重新計時
    pub fn reset(&self) {
        let _ = self.control.send(Control::Reset);
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for CarouselAutoplay {
    fn drop(&mut self) {
        self.task.abort();
    }
}
