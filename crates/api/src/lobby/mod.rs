pub mod error;

use crate::session::{Command, Effect, Reply, Rules, Session};
use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::time::Duration;
use dashmap::{mapref::entry::Entry, DashMap};
use db::{Ledger, QuestionRepository};
use rand::Rng;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant, MissedTickBehavior},
};

/// Number of entries served by [`Lobby::leaderboard`].
pub const LEADERBOARD_SIZE: u32 = 10;

const TICK: Duration = Duration::from_secs(1);

struct Envelope {
    /// `None` only asks for the current view.
    command: Option<Command>,
    reply: oneshot::Sender<error::Result<Vec<u8>>>,
}

type Channel = mpsc::Sender<Envelope>;
type Registry = DashMap<u64, Channel>;

#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub rules: Rules,
    /// Inactivity after which a session is closed.
    pub idle: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self { rules: Rules::default(), idle: Duration::from_secs(15 * 60) }
    }
}

struct Inner {
    /// Channels to every live session task.
    sessions: Registry,
    ledger: Ledger,
    questions: Box<dyn QuestionRepository>,
    settings: Settings,
}

#[derive(Clone)]
pub struct Lobby {
    inner: Arc<Inner>,
}

fn encode_id(key: u64) -> alloc::string::String {
    hex::encode(key.to_be_bytes())
}

fn decode_id(id: &str) -> Option<u64> {
    let mut bytes = [0; 8];
    hex::decode_to_slice(id, &mut bytes).ok()?;
    Some(u64::from_be_bytes(bytes))
}

fn render(session: &Session, id: Option<&str>, celebrate: bool) -> error::Result<Vec<u8>> {
    serde_json::to_vec(&Reply { id, celebrate, view: session.view() }).map_err(|_| error::Error::Fatal)
}

impl Lobby {
    pub fn new(ledger: Ledger, questions: Box<dyn QuestionRepository>, settings: Settings) -> Self {
        let inner = Inner { sessions: Registry::new(), ledger, questions, settings };
        Self { inner: Arc::new(inner) }
    }

    /// Starts a new session task and returns its first view.
    pub fn open(&self) -> error::Result<Vec<u8>> {
        let session = Session::new(self.inner.settings.rules);
        let (tx, rx) = mpsc::channel(8);

        // Ids double as bearer tokens, so they are drawn at random.
        let mut rng = rand::thread_rng();
        let key = loop {
            let key: u64 = rng.gen();
            if let Entry::Vacant(slot) = self.inner.sessions.entry(key) {
                slot.insert(tx);
                break key;
            }
        };

        let id = encode_id(key);
        let body = match render(&session, Some(&id), false) {
            Ok(body) => body,
            Err(err) => {
                self.inner.sessions.remove(&key);
                return Err(err);
            }
        };

        tokio::spawn(run(self.inner.clone(), key, session, rx));
        log::info!("session {id} opened");
        Ok(body)
    }

    /// Forwards a command (or a plain view request) to the session task.
    pub async fn dispatch(&self, id: &str, command: Option<Command>) -> error::Result<Vec<u8>> {
        let key = decode_id(id).ok_or(error::Error::UnknownSession)?;
        let channel = self.inner.sessions.get(&key).map(|entry| entry.clone()).ok_or(error::Error::UnknownSession)?;

        let (reply, rx) = oneshot::channel();
        channel.send(Envelope { command, reply }).await.map_err(|_| error::Error::UnknownSession)?;
        rx.await.map_err(|_| error::Error::UnknownSession)?
    }

    pub async fn leaderboard(&self) -> error::Result<Vec<u8>> {
        let entries = self.inner.ledger.leaderboard(LEADERBOARD_SIZE).await.map_err(|err| {
            log::error!("cannot load the leaderboard: {err}");
            error::Error::Storage
        })?;
        serde_json::to_vec(&entries).map_err(|_| error::Error::Fatal)
    }
}

async fn run(inner: Arc<Inner>, key: u64, mut session: Session, mut rx: mpsc::Receiver<Envelope>) {
    let idle = inner.settings.idle;
    let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut expiry = core::pin::pin!(time::sleep(idle));

    loop {
        tokio::select! {
            biased;
            envelope = rx.recv() => {
                let Some(Envelope { command, reply }) = envelope else {
                    break;
                };
                let result = serve(&inner, &mut session, command).await;
                if reply.send(result).is_err() {
                    log::warn!("session {key:016x} lost a reply");
                }
                if session.take_fresh_round() {
                    ticker.reset();
                }
                expiry.as_mut().reset(Instant::now() + idle);
            }
            _ = ticker.tick(), if session.is_counting() => session.tick(),
            _ = &mut expiry => {
                log::info!("session {key:016x} closed after {}s of inactivity", idle.as_secs());
                break;
            }
        }
    }

    inner.sessions.remove(&key);
    session.close();
}

async fn serve(inner: &Inner, session: &mut Session, command: Option<Command>) -> error::Result<Vec<u8>> {
    let Some(command) = command else {
        return render(session, None, false);
    };

    let mut celebrate = false;
    match session.apply(command) {
        Effect::Nothing => {}
        Effect::Celebrate => celebrate = true,
        Effect::Register(info) => {
            let participant = inner.ledger.save_participant(&info, session.language()).await.map_err(|err| {
                log::error!("cannot save participant: {err}");
                match err {
                    db::error::Error::BadInput => error::Error::BadRequest,
                    _ => error::Error::Storage,
                }
            })?;
            log::info!("participant {participant} registered");
            session.admit(participant, inner.questions.get());
        }
        Effect::Complete(result) => match inner.ledger.save_result(&result).await {
            Ok(()) => log::info!("participant {} finished with {} points", result.participant, result.score),
            Err(err) => log::error!("cannot save the result of participant {}: {err}", result.participant),
        },
        Effect::GrandPrize(participant) => match inner.ledger.enter_grand_prize(participant).await {
            Ok(()) => log::info!("participant {participant} entered the grand prize draw"),
            Err(err) => log::error!("cannot enter participant {participant} into the draw: {err}"),
        },
    }

    render(session, None, celebrate)
}
