//! Operator session task
//!
//! The single control flow of the firmware: menu, password entry,
//! procedures and admin mode all run here, one at a time.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Delay, Timer};
use embedded_io_async::Read;

use interlock_core::config::InterlockConfig;
use interlock_core::console::{
    LineBuffer, LineEvent, MenuChoice, BANNER, CLEAR_SCREEN, INVALID_INPUT, INVALID_OPTION, MENU,
    NEWLINE, PASSWORDS_UPDATED, PROMPT_ADMIN, PROMPT_NEW_A, PROMPT_NEW_B, PROMPT_PASSWORD,
    PROMPT_UNLOCK,
};
use interlock_core::controller::Controller;
use interlock_core::input::InputBank;
use interlock_core::procedure::MachineId;
use interlock_core::InterlockError;
use interlock_hal_rp2040::JoystickAdc;

use crate::board::{ChannelFeedback, EmbassyClock};
use crate::channels::{ConsoleMessage, CONSOLE_CHANNEL};
use crate::INPUTS;

/// Line buffer size; one byte short of it is usable, like a C string
const LINE_LEN: usize = 20;

/// Time to read an outcome before the menu comes back
const OUTCOME_PAUSE_MS: u32 = 1_000;

type Rx = BufferedUartRx<'static, UART0>;
type Line = LineBuffer<LINE_LEN>;
type SessionController =
    Controller<&'static InputBank, JoystickAdc, EmbassyClock, Delay, ChannelFeedback>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Echo {
    Plain,
    Masked,
}

#[embassy_executor::task]
pub async fn session_task(mut rx: Rx, joystick: JoystickAdc, config: InterlockConfig) {
    info!("Session task started");

    let mut ctl: SessionController = Controller::new(
        &config,
        &INPUTS,
        joystick,
        EmbassyClock,
        Delay,
        ChannelFeedback,
    );
    let mut line = Line::new();

    say(CLEAR_SCREEN).await;
    say(BANNER).await;
    Timer::after_millis(config.timing.boot_delay_ms as u64).await;

    loop {
        if ctl.is_locked() {
            say(PROMPT_UNLOCK).await;
            read_line(&mut rx, &mut line, Echo::Masked).await;
            let Some(password) = line.line() else {
                say(INVALID_INPUT).await;
                continue;
            };
            match ctl.unlock(password) {
                Ok(()) => info!("Lockout cleared by admin"),
                Err(e) => {
                    warn!("Unlock rejected");
                    report(e).await;
                }
            }
            continue;
        }

        say(MENU).await;
        read_line(&mut rx, &mut line, Echo::Plain).await;

        match line.line().map_or(MenuChoice::Invalid, MenuChoice::parse) {
            MenuChoice::UseMachine(machine) => {
                say(PROMPT_PASSWORD).await;
                read_line(&mut rx, &mut line, Echo::Masked).await;
                let Some(password) = line.line() else {
                    say(INVALID_INPUT).await;
                    continue;
                };
                info!("Activation requested: machine {}", machine);
                match ctl.request_activation(machine, password).await {
                    Ok(()) => info!("Machine {} activated", machine),
                    Err(e) => {
                        warn!("Machine {} not activated: {}", machine, e);
                        report(e).await;
                    }
                }
                ctl.pause_ms(OUTCOME_PAUSE_MS).await;
            }
            MenuChoice::Admin => admin_mode(&mut ctl, &mut rx, &mut line).await,
            MenuChoice::Invalid => say(INVALID_OPTION).await,
        }
    }
}

/// Admin login followed by new passwords for both machines
async fn admin_mode(ctl: &mut SessionController, rx: &mut Rx, line: &mut Line) {
    say(PROMPT_ADMIN).await;
    read_line(rx, line, Echo::Masked).await;
    let Some(password) = line.line() else {
        say(INVALID_INPUT).await;
        return;
    };

    let mut session = match ctl.admin_session(password) {
        Ok(session) => session,
        Err(e) => {
            warn!("Admin login rejected");
            report(e).await;
            return;
        }
    };
    info!("Admin session opened");

    for (machine, prompt) in [(MachineId::A, PROMPT_NEW_A), (MachineId::B, PROMPT_NEW_B)] {
        say(prompt).await;
        read_line(rx, line, Echo::Plain).await;
        // Stop here rather than store a password the operator did not type
        let Some(password) = line.line() else {
            say(INVALID_INPUT).await;
            return;
        };
        if let Err(e) = session.set_machine_password(machine, password) {
            report(e).await;
            return;
        }
        info!("Password for machine {} changed", machine);
    }

    say(PASSWORDS_UPDATED).await;
}

/// Read one line from the console, echoing as it goes
async fn read_line(rx: &mut Rx, line: &mut Line, echo: Echo) {
    line.clear();
    let mut byte = [0u8; 1];

    loop {
        match rx.read(&mut byte).await {
            Ok(0) => continue,
            Ok(_) => match line.push(byte[0]) {
                LineEvent::Echo(b) => {
                    let message = match echo {
                        Echo::Plain => ConsoleMessage::Echo(b),
                        Echo::Masked => ConsoleMessage::Mask,
                    };
                    CONSOLE_CHANNEL.send(message).await;
                }
                LineEvent::Ignored => {}
                LineEvent::Complete => {
                    say(NEWLINE).await;
                    return;
                }
            },
            Err(e) => warn!("Console read error: {:?}", e),
        }
    }
}

async fn say(text: &'static str) {
    CONSOLE_CHANNEL.send(ConsoleMessage::Text(text)).await;
}

async fn report(error: InterlockError) {
    if error.is_user_visible() {
        CONSOLE_CHANNEL.send(ConsoleMessage::Error(error)).await;
    }
}
