//! Console UART transmit task
//!
//! Renders [`ConsoleMessage`]s in the order they were queued. Feedback
//! events and session prompts share one channel so text never interleaves.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use interlock_core::console::{write_error, write_event};

use crate::channels::{ConsoleMessage, CONSOLE_CHANNEL};

/// Longest rendered line
const LINE_CAPACITY: usize = 192;

#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Console TX task started");

    let mut text: String<LINE_CAPACITY> = String::new();

    loop {
        let message = CONSOLE_CHANNEL.receive().await;
        text.clear();

        let rendered = match message {
            ConsoleMessage::Text(s) => {
                send(&mut tx, s.as_bytes()).await;
                continue;
            }
            ConsoleMessage::Echo(byte) => {
                send(&mut tx, &[byte]).await;
                continue;
            }
            ConsoleMessage::Mask => {
                send(&mut tx, b"*").await;
                continue;
            }
            ConsoleMessage::Event(event) => write_event(&mut text, &event),
            ConsoleMessage::Error(error) => write_error(&mut text, &error),
        };

        if rendered.is_err() {
            warn!("Console line truncated");
        }
        if !text.is_empty() {
            send(&mut tx, text.as_bytes()).await;
        }
    }
}

async fn send(tx: &mut BufferedUartTx<'static, UART0>, bytes: &[u8]) {
    if let Err(e) = tx.write_all(bytes).await {
        warn!("Console write failed: {:?}", e);
    }
}
