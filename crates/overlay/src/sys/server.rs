use crate::events::AppEvent;
use async_channel::Sender;
use pager::SOCKET_PATH;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

/// Maps one line of the socket protocol to an event.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    match line.trim() {
        "show" => Some(AppEvent::Show),
        "build" => Some(AppEvent::ShowBuild),
        "hide" => Some(AppEvent::Hide),
        _ => None,
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // stale socket from a previous run
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                let _ = tx.send(event).await;
                            }
                            None => log::debug!("Unknown command '{}'", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
