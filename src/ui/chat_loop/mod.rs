//! Main chat event loop
//!
//! The loop owns the [`App`]. Terminal input arrives from a reader task and
//! webhook replies from one request task per turn; both are funnelled through
//! a single channel so state only changes here.

mod keys;
pub mod lifecycle;

use std::{error::Error, io, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use self::keys::{apply_key, map_key, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal};
use crate::core::app::App;
use crate::core::conversation::PendingTurn;
use crate::core::gateway::Gateway;
use crate::core::message::GatewayResult;
use crate::ui::renderer::ui;
use crate::utils::sanitize::strip_control_sequences;

const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum UiEvent {
    Terminal(Event),
    Reply(GatewayResult),
    RequestRedraw,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Terminal(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn spawn_gateway_request(
    gateway: Arc<dyn Gateway>,
    event_tx: mpsc::UnboundedSender<UiEvent>,
    pending: PendingTurn,
) {
    tokio::spawn(async move {
        let result = gateway
            .send_message(&pending.session_id, &pending.message)
            .await;
        let _ = event_tx.send(UiEvent::Reply(result));
    });
}

/// Apply one event to the app. Returns `true` when the screen needs a redraw.
///
/// `dispatch` receives the request for a newly submitted turn.
pub fn handle_event<F>(app: &mut App, event: UiEvent, dispatch: &mut F) -> bool
where
    F: FnMut(PendingTurn),
{
    match event {
        UiEvent::Terminal(Event::Key(key)) => {
            let action = map_key(&key, app.input_is_empty(), app.textarea.lines().len());
            if action == KeyAction::Submit {
                if let Some(pending) = app.submit_input() {
                    dispatch(pending);
                }
                return true;
            }
            apply_key(app, key, action)
        }
        UiEvent::Terminal(Event::Paste(text)) => {
            let text = strip_control_sequences(&text);
            if text.is_empty() {
                return false;
            }
            app.status = None;
            app.textarea.insert_str(text);
            true
        }
        UiEvent::Terminal(Event::Resize(..)) => true,
        UiEvent::Terminal(_) => false,
        UiEvent::Reply(result) => {
            debug!(is_error = result.is_error(), "reply received");
            app.receive_reply(result);
            true
        }
        UiEvent::RequestRedraw => true,
    }
}

async fn drive<B: Backend>(
    app: &mut App,
    terminal: &mut Terminal<B>,
    gateway: Arc<dyn Gateway>,
    event_tx: mpsc::UnboundedSender<UiEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> io::Result<()> {
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);
    spinner.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut dispatch = |pending: PendingTurn| {
        spawn_gateway_request(gateway.clone(), event_tx.clone(), pending);
    };

    let mut request_redraw = true;
    loop {
        if std::mem::take(&mut request_redraw) {
            terminal.draw(|f| ui(f, app))?;
        }
        if app.exit_requested {
            return Ok(());
        }

        tokio::select! {
            maybe_event = event_rx.recv() => match maybe_event {
                Some(event) => request_redraw = handle_event(app, event, &mut dispatch),
                None => return Ok(()),
            },
            _ = spinner.tick(), if app.is_awaiting_reply() => request_redraw = true,
        }
    }
}

pub async fn run_chat(mut app: App, gateway: Arc<dyn Gateway>) -> Result<(), Box<dyn Error>> {
    info!(session_id = %app.session().id(), "starting chat");

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx.clone());

    let result = drive(&mut app, &mut terminal, gateway, event_tx, &mut event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    info!(turns = app.session().len(), "chat ended");
    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{GatewayResult, Turn};
    use crate::core::session::Session;
    use crate::ui::branding::Branding;
    use crate::ui::theme::Theme;
    use crate::utils::logging::LoggingState;
    use async_trait::async_trait;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Mutex;

    fn setup_app() -> App {
        App::new(
            Session::new(),
            Branding::default(),
            Theme::dark_default(),
            LoggingState::disabled(),
        )
    }

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn type_chars(app: &mut App, text: &str, sent: &mut Vec<PendingTurn>) {
        let mut dispatch = |pending| sent.push(pending);
        for ch in text.chars() {
            handle_event(
                app,
                key_event(KeyCode::Char(ch), KeyModifiers::NONE),
                &mut dispatch,
            );
        }
    }

    fn press(
        app: &mut App,
        code: KeyCode,
        modifiers: KeyModifiers,
        sent: &mut Vec<PendingTurn>,
    ) -> bool {
        let mut dispatch = |pending| sent.push(pending);
        handle_event(app, key_event(code, modifiers), &mut dispatch)
    }

    struct EchoGateway {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Gateway for EchoGateway {
        async fn send_message(&self, session_id: &str, message: &str) -> GatewayResult {
            self.calls
                .lock()
                .expect("lock")
                .push((session_id.to_string(), message.to_string()));
            GatewayResult::reply(format!("echo: {message}"))
        }
    }

    #[test]
    fn enter_dispatches_exactly_one_request() {
        let mut app = setup_app();
        let mut sent = Vec::new();

        type_chars(&mut app, "hi", &mut sent);
        assert!(press(&mut app, KeyCode::Enter, KeyModifiers::NONE, &mut sent));
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "hi");

        // Second submit while waiting is refused
        type_chars(&mut app, "again", &mut sent);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE, &mut sent);
        assert_eq!(sent.len(), 1);
        assert_eq!(app.input_text(), "again");
    }

    #[test]
    fn reply_event_completes_the_turn() {
        let mut app = setup_app();
        let mut sent = Vec::new();
        type_chars(&mut app, "ping", &mut sent);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE, &mut sent);

        let mut dispatch = |_pending: PendingTurn| {};
        assert!(handle_event(
            &mut app,
            UiEvent::Reply(GatewayResult::reply("pong")),
            &mut dispatch
        ));

        assert_eq!(
            app.session().turns(),
            &[Turn::user("ping"), Turn::assistant(GatewayResult::reply("pong"))]
        );
        assert!(!app.is_awaiting_reply());
    }

    #[test]
    fn paste_keeps_newlines_in_the_input() {
        let mut app = setup_app();
        let mut dispatch = |_pending: PendingTurn| {};

        handle_event(
            &mut app,
            UiEvent::Terminal(Event::Paste("one\r\ntwo".to_string())),
            &mut dispatch,
        );

        assert_eq!(app.input_text(), "one\ntwo");
    }

    #[test]
    fn paste_drops_escape_sequences() {
        let mut app = setup_app();
        let mut dispatch = |_pending: PendingTurn| {};

        let redraw = handle_event(
            &mut app,
            UiEvent::Terminal(Event::Paste("\x1b[31mred\x1b[0m".to_string())),
            &mut dispatch,
        );

        assert!(redraw);
        assert_eq!(app.input_text(), "red");
    }

    #[test]
    fn alt_enter_inserts_newline_instead_of_sending() {
        let mut app = setup_app();
        let mut sent = Vec::new();
        type_chars(&mut app, "a", &mut sent);
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT, &mut sent);
        type_chars(&mut app, "b", &mut sent);

        assert!(sent.is_empty());
        assert_eq!(app.input_text(), "a\nb");
    }

    #[test]
    fn escape_on_empty_input_requests_exit() {
        let mut app = setup_app();
        let mut sent = Vec::new();
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE, &mut sent);
        assert!(app.exit_requested);
    }

    #[test]
    fn typing_clears_the_status_line() {
        let mut app = setup_app();
        let mut sent = Vec::new();
        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL, &mut sent);
        assert!(app
            .status
            .as_deref()
            .is_some_and(|s| s.contains("No log file")));

        type_chars(&mut app, "x", &mut sent);
        assert!(app.status.is_none());
    }

    #[tokio::test]
    async fn drive_redraws_each_turn_and_stops_on_quit() {
        use ratatui::backend::TestBackend;

        let mut app = setup_app();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).expect("terminal");
        let gateway: Arc<dyn Gateway> = Arc::new(EchoGateway {
            calls: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        for ch in "hi".chars() {
            tx.send(key_event(KeyCode::Char(ch), KeyModifiers::NONE))
                .expect("send");
        }
        tx.send(key_event(KeyCode::Enter, KeyModifiers::NONE))
            .expect("send");

        let quit_tx = tx.clone();
        let quit_later = async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            quit_tx
                .send(key_event(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .expect("send");
        };

        let (result, ()) = tokio::join!(
            drive(&mut app, &mut terminal, gateway, tx, &mut rx),
            quit_later
        );
        result.expect("drive");

        assert!(app.exit_requested);
        assert_eq!(
            app.session().turns(),
            &[Turn::user("hi"), Turn::assistant(GatewayResult::reply("echo: hi"))]
        );
        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("echo: hi"));
    }

    #[tokio::test]
    async fn gateway_task_reports_back_through_the_channel() {
        let gateway = Arc::new(EchoGateway {
            calls: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_gateway_request(
            gateway.clone(),
            tx,
            PendingTurn {
                session_id: "session-1".to_string(),
                message: "hello".to_string(),
            },
        );

        match rx.recv().await {
            Some(UiEvent::Reply(result)) => assert_eq!(result.contract, "echo: hello"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            gateway.calls.lock().expect("lock").as_slice(),
            &[("session-1".to_string(), "hello".to_string())]
        );
    }
}
