use crate::core::carousel::{Carousel, CarouselAutoplay};
use crate::core::orchestrator::SearchOrchestrator;
use crate::core::render;
use crate::core::{SearchQuery, SearchResult, UniversitySource};
use crate::utils::error::SearchError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Idle,
    Results(String),
    NoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn for_failure(failure: &SearchError) -> Self {
        let level = match failure {
            SearchError::InvalidInput => NotificationLevel::Warning,
            _ => NotificationLevel::Error,
        };
        Self {
            level,
            message: failure.user_message().to_string(),
        }
    }
}

/// 頁面上所有可變狀態，集中在一個物件裡
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub loading: bool,
    pub view: View,
    pub notification: Option<Notification>,
    pub last_result: Option<SearchResult>,
    pub carousel: Carousel,
    latest_search: u64,
}

impl PageState {
    /// 開始新的搜尋並回傳其序號，之前的搜尋即被取代
    fn begin_search(&mut self) -> u64 {
        self.latest_search += 1;
        self.loading = true;
        self.view = View::Idle;
        self.notification = None;
        self.latest_search
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest_search == seq
    }

    pub fn latest_search(&self) -> u64 {
        self.latest_search
    }
}

/// 搜尋期間持有；離開時 (含錯誤、取消) 清除 loading，除非已有更新的搜尋
struct LoadingGuard {
    state: Arc<Mutex<PageState>>,
    seq: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_latest(self.seq) {
            state.loading = false;
        }
    }
}

/// 每個使用者意圖對應一個指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitSearch {
        country: String,
        state_province: Option<String>,
    },
    CarouselNext,
    CarouselPrev,
    CarouselGoTo(usize),
    CarouselHover(bool),
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Rendered(usize),
    NoResults { failure: Option<SearchError> },
    Rejected,
    Stale,
    Carousel(usize),
    Unchanged,
}

pub struct PageController<S: UniversitySource> {
    orchestrator: SearchOrchestrator<S>,
    state: Arc<Mutex<PageState>>,
    autoplay: Mutex<Option<CarouselAutoplay>>,
}

impl<S: UniversitySource> PageController<S> {
    pub fn new(orchestrator: SearchOrchestrator<S>) -> Self {
        Self {
            orchestrator,
            state: Arc::new(Mutex::new(PageState::default())),
            autoplay: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> PageState {
        self.state().clone()
    }

    pub async fn dispatch(&self, command: Command) -> Dispatch {
        match command {
            Command::SubmitSearch {
                country,
                state_province,
            } => {
                self.submit_search(SearchQuery::new(country, state_province))
                    .await
            }
            Command::CarouselNext => self.move_carousel(|c| Some(c.next())),
            Command::CarouselPrev => self.move_carousel(|c| Some(c.prev())),
            Command::CarouselGoTo(index) => self.move_carousel(|c| c.go_to(index)),
            Command::CarouselHover(hovering) => {
                if let Some(autoplay) = self.autoplay_slot().as_ref() {
                    if hovering {
                        autoplay.pause();
                    } else {
                        autoplay.resume();
                    }
                }
                Dispatch::Unchanged
            }
            Command::DismissNotification => {
                self.state().notification = None;
                Dispatch::Unchanged
            }
        }
    }

    async fn submit_search(&self, query: SearchQuery) -> Dispatch {
        if let Err(failure) = query.validated_country() {
            self.state().notification = Some(Notification::for_failure(&failure));
            return Dispatch::Rejected;
        }

        let seq = self.state().begin_search();
        let _loading = LoadingGuard {
            state: self.state.clone(),
            seq,
        };

        let result = match self.orchestrator.search(&query).await {
            Ok(result) => result,
            Err(failure) => SearchResult::degraded(failure),
        };

        let mut state = self.state();
        if !state.is_latest(seq) {
            tracing::debug!("Discarding stale search #{} (latest is #{})", seq, state.latest_search);
            return Dispatch::Stale;
        }

        let dispatch = if result.is_empty() {
            state.view = View::NoResults;
            state.notification = result.failure.as_ref().map(Notification::for_failure);
            Dispatch::NoResults {
                failure: result.failure.clone(),
            }
        } else {
            state.view = View::Results(render::render_results(&result));
            Dispatch::Rendered(result.len())
        };
        state.last_result = Some(result);
        dispatch
    }

    fn move_carousel<F>(&self, step: F) -> Dispatch
    where
        F: FnOnce(&mut Carousel) -> Option<usize>,
    {
        let moved = step(&mut self.state().carousel);
        match moved {
            Some(index) => {
                if let Some(autoplay) = self.autoplay_slot().as_ref() {
                    autoplay.reset();
                }
                Dispatch::Carousel(index)
            }
            None => Dispatch::Unchanged,
        }
    }

    fn autoplay_slot(&self) -> MutexGuard<'_, Option<CarouselAutoplay>> {
        self.autoplay.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 啟動輪播自動播放；已在執行時會先停止舊的
    pub fn start_autoplay(&self, period: Duration) {
        let state = self.state.clone();
        let autoplay = CarouselAutoplay::start(period, move || {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .carousel
                .next();
        });

        if let Some(previous) = self.autoplay_slot().replace(autoplay) {
            previous.stop();
        }
    }

    /// 頁面狀態轉換時停止所有排程
    pub fn teardown(&self) {
        if let Some(autoplay) = self.autoplay_slot().take() {
            autoplay.stop();
        }
    }
}
