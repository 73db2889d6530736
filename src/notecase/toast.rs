//! # Deletion Toast
//!
//! A transient "item deleted" notification with two states, [`ToastState::Hidden`]
//! and [`ToastState::Visible`]. Showing it starts a timer task on the Tokio
//! runtime; the toast hides itself when the timer elapses unless it was
//! dismissed or shown again first.
//!
//! Only one toast exists. Showing it while visible replaces the item kind and
//! restarts the timer, so the toast always hides one full duration after the
//! latest delete. Superseded timers are aborted, and each timer also carries the
//! generation it was started for, so a timer that already woke up can never
//! hide a newer toast.

use crate::model::ItemKind;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastState {
    Hidden,
    Visible(ItemKind),
}

impl ToastState {
    pub fn is_visible(&self) -> bool {
        matches!(self, ToastState::Visible(_))
    }

    pub fn message(&self) -> Option<String> {
        match self {
            ToastState::Hidden => None,
            ToastState::Visible(kind) => Some(format!(
                "{} was deleted. You can recover it anytime from the trash.",
                kind.label()
            )),
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: ToastState,
    generation: u64,
}

#[derive(Debug)]
pub struct DeletionToast {
    duration: Duration,
    shared: Arc<Mutex<Shared>>,
    timer: Option<JoinHandle<()>>,
}

impl DeletionToast {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            shared: Arc::new(Mutex::new(Shared {
                state: ToastState::Hidden,
                generation: 0,
            })),
            timer: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Applies from the next `show` on.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn state(&self) -> ToastState {
        lock(&self.shared).state
    }

    /// Shows the toast for `kind`, restarting the hide timer.
    ///
    /// Outside a Tokio runtime there is no timer and only `dismiss` or the
    /// next `show` changes the state.
    pub fn show(&mut self, kind: ItemKind) {
        self.cancel_timer();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = ToastState::Visible(kind);
            shared.generation
        };
        debug!("toast shown for {} (generation {})", kind, generation);

        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime for the toast timer; it stays up until dismissed");
            return;
        };
        let shared = Arc::clone(&self.shared);
        let duration = self.duration;
        self.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            let mut shared = lock(&shared);
            if shared.generation == generation {
                shared.state = ToastState::Hidden;
                debug!("toast expired (generation {})", generation);
            }
        }));
    }

    pub fn dismiss(&mut self) {
        self.cancel_timer();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.state = ToastState::Hidden;
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Default for DeletionToast {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Drop for DeletionToast {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

// The guarded data is two plain fields, so a poisoned lock is still usable.
fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn hides_after_duration() {
        let mut toast = DeletionToast::default();
        toast.show(ItemKind::Note);
        assert_eq!(toast.state(), ToastState::Visible(ItemKind::Note));

        sleep(ms(2999)).await;
        assert!(toast.state().is_visible());

        sleep(ms(2)).await;
        assert_eq!(toast.state(), ToastState::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_hides_immediately_and_cancels_timer() {
        let mut toast = DeletionToast::default();
        toast.show(ItemKind::Card);
        toast.dismiss();
        assert_eq!(toast.state(), ToastState::Hidden);

        sleep(ms(3500)).await;
        assert_eq!(toast.state(), ToastState::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn second_delete_restarts_the_timer() {
        let mut toast = DeletionToast::default();
        toast.show(ItemKind::Card);

        sleep(ms(2000)).await;
        toast.show(ItemKind::Note);

        // Past the first timer's deadline: still visible, now for the note.
        sleep(ms(1500)).await;
        assert_eq!(toast.state(), ToastState::Visible(ItemKind::Note));

        // Past the second deadline.
        sleep(ms(1600)).await;
        assert_eq!(toast.state(), ToastState::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn respects_configured_duration() {
        let mut toast = DeletionToast::new(ms(100));
        toast.show(ItemKind::Note);
        sleep(ms(101)).await;
        assert!(!toast.state().is_visible());
    }

    #[test]
    fn shows_without_a_runtime() {
        let mut toast = DeletionToast::default();
        toast.show(ItemKind::Note);
        assert_eq!(toast.state(), ToastState::Visible(ItemKind::Note));

        toast.show(ItemKind::Card);
        assert_eq!(toast.state(), ToastState::Visible(ItemKind::Card));

        toast.dismiss();
        assert_eq!(toast.state(), ToastState::Hidden);
    }

    #[test]
    fn message_names_the_kind() {
        assert_eq!(
            ToastState::Visible(ItemKind::Card).message().unwrap(),
            "Card was deleted. You can recover it anytime from the trash."
        );
        assert!(ToastState::Hidden.message().is_none());
    }
}
