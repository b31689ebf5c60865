//! Async driver for a [`TimerEngine`].
//!
//! One spawned task owns the engine. Commands arrive over a channel and run
//! to completion one at a time, in arrival order; between commands the task
//! sleeps until the scheduler's next deadline and applies a single tick.
//! Observers only ever see the state after a command or tick has finished:
//! the latest [`TimerView`] on a `watch` channel and every [`Event`] on a
//! `broadcast` channel.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::engine::TimerEngine;
use super::mode::Mode;
use super::snapshot::{TimerSnapshot, TimerView};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::sessions::SessionRecord;
use crate::settings::SettingsProfile;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

type Job = Box<dyn FnOnce(&mut TimerEngine) + Send>;

enum Message {
    Run(Job),
    Shutdown(oneshot::Sender<()>),
}

pub struct TimerService;

impl TimerService {
    /// Move `engine` into a new task on the current tokio runtime.
    ///
    /// The task ends when every handle is dropped or [`TimerHandle::shutdown`]
    /// is called; the engine is dropped with it, which stops its countdown.
    pub fn spawn(engine: TimerEngine) -> TimerHandle {
        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let (views, view_rx) = watch::channel(engine.view());
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(run(engine, inbox, views, events.clone()));

        TimerHandle {
            commands,
            views: view_rx,
            events,
        }
    }
}

async fn run(
    mut engine: TimerEngine,
    mut inbox: mpsc::Receiver<Message>,
    views: watch::Sender<TimerView>,
    events: broadcast::Sender<Event>,
) {
    publish(&mut engine, &views, &events);
    let mut ack = None;

    loop {
        let deadline = engine.next_deadline();
        tokio::select! {
            message = inbox.recv() => match message {
                Some(Message::Run(job)) => job(&mut engine),
                Some(Message::Shutdown(done)) => {
                    ack = Some(done);
                    break;
                }
                None => break,
            },
            () = wait_for(deadline) => {
                engine.poll_scheduler(Instant::now());
            }
        }
        publish(&mut engine, &views, &events);
    }

    drop(engine);
    debug!("timer service stopped");
    if let Some(done) = ack {
        let _ = done.send(());
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn publish(
    engine: &mut TimerEngine,
    views: &watch::Sender<TimerView>,
    events: &broadcast::Sender<Event>,
) {
    for event in engine.drain_events() {
        // No subscribers is fine.
        let _ = events.send(event);
    }
    views.send_replace(engine.view());
}

/// Cheap, cloneable access to a running [`TimerService`].
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Message>,
    views: watch::Receiver<TimerView>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    /// Latest published view.
    pub fn view(&self) -> TimerView {
        self.views.borrow().clone()
    }

    /// Receiver that is notified after every command and tick.
    pub fn watch(&self) -> watch::Receiver<TimerView> {
        self.views.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    async fn call<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut TimerEngine) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |engine| {
            let _ = reply.send(f(engine));
        });
        self.commands
            .send(Message::Run(job))
            .await
            .map_err(|_| CoreError::ServiceStopped)?;
        response.await.map_err(|_| CoreError::ServiceStopped)
    }

    /// Run a read-only query against the engine.
    pub async fn read<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&TimerEngine) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.call(move |engine| f(engine)).await
    }

    pub async fn start(&self) -> Result<Option<Event>> {
        self.call(TimerEngine::start).await
    }

    pub async fn pause(&self) -> Result<Option<Event>> {
        self.call(TimerEngine::pause).await
    }

    pub async fn reset(&self) -> Result<Option<Event>> {
        self.call(TimerEngine::reset).await
    }

    pub async fn change_mode(&self, mode: Mode) -> Result<Option<Event>> {
        self.call(move |engine| engine.change_mode(mode)).await
    }

    pub async fn next_mode(&self, log_skipped: bool) -> Result<Option<Event>> {
        self.call(move |engine| engine.next_mode(log_skipped)).await
    }

    pub async fn reset_cycles(&self) -> Result<Option<Event>> {
        self.call(TimerEngine::reset_cycles).await
    }

    pub async fn full_reset(&self) -> Result<Option<Event>> {
        self.call(TimerEngine::full_reset).await
    }

    pub async fn update_settings(&self, profile: SettingsProfile) -> Result<Event> {
        let outcome = self
            .call(move |engine| engine.update_settings(profile))
            .await?;
        Ok(outcome?)
    }

    pub async fn set_session_note(&self, note: Option<String>) -> Result<()> {
        self.call(move |engine| engine.set_session_note(note)).await
    }

    pub async fn remove_session(&self, id: i64) -> Result<bool> {
        self.call(move |engine| engine.remove_session(id)).await
    }

    pub async fn clear_sessions(&self) -> Result<()> {
        self.call(TimerEngine::clear_sessions).await
    }

    pub async fn snapshot(&self) -> Result<TimerSnapshot> {
        self.read(|engine| engine.snapshot().clone()).await
    }

    pub async fn settings(&self) -> Result<SettingsProfile> {
        self.read(|engine| engine.settings().clone()).await
    }

    pub async fn sessions(&self) -> Result<Vec<SessionRecord>> {
        self.read(|engine| engine.sessions().records().to_vec()).await
    }

    /// Stop the service and wait until the engine has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        let (done, stopped) = oneshot::channel();
        self.commands
            .send(Message::Shutdown(done))
            .await
            .map_err(|_| CoreError::ServiceStopped)?;
        stopped.await.map_err(|_| CoreError::ServiceStopped)
    }
}
