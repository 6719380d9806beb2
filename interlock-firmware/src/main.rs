//! Interlock - access-control and safety-interlock firmware
//!
//! Two machines ("A" and "B") sit behind a password and a timed physical
//! challenge. The operator works a serial console on UART0 and the panel
//! buttons, joystick and feedback outputs of an RP2040 board.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use interlock_core::feedback::RgbIndicator;
use interlock_core::input::{InputBank, InputId};
use interlock_hal_rp2040::{GpioOutput, JoystickAdc, PinBank, PwmBuzzer, Ws2812Matrix};

mod board;
mod channels;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit interlock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../interlock.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// Debounced button state, written by the button tasks
pub static INPUTS: InputBank = InputBank::new();

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Interlock firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, board) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);
    INPUTS.set_debounce_ms(config.timing.debounce_ms);

    // Console UART (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(board.uart0, board.uart_tx, board.uart_rx, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Console UART initialized");

    // Buttons
    let pins = &config.pins;
    let buttons = [
        (InputId::ButtonA, pins.button_a),
        (InputId::ButtonB, pins.button_b),
        (InputId::JoystickButton, pins.joystick_button),
    ];
    for (id, pin_cfg) in buttons {
        match bank.take(pin_cfg.pin) {
            Ok(pin) => {
                let pull = if pin_cfg.pull_up { Pull::Up } else { Pull::Down };
                let input = Input::new(pin, pull);
                spawner
                    .spawn(tasks::button_task(id, input, pin_cfg.inverted))
                    .unwrap();
            }
            Err(e) => error!("{} on gpio{} unavailable: {}", id, pin_cfg.pin, e),
        }
    }

    // Joystick Y (ADC0)
    let adc = Adc::new_blocking(board.adc, Default::default());
    let y_axis = Channel::new_pin(board.joystick_y, Pull::None);
    let joystick = JoystickAdc::new(adc, y_axis);

    // RGB LED
    let (Ok(red), Ok(green), Ok(blue)) = (
        bank.take(pins.led_red.pin),
        bank.take(pins.led_green.pin),
        bank.take(pins.led_blue.pin),
    ) else {
        defmt::panic!("RGB LED pins unavailable");
    };
    let led = RgbIndicator::new(
        GpioOutput::new(red, pins.led_red.inverted),
        GpioOutput::new(green, pins.led_green.inverted),
        GpioOutput::new(blue, pins.led_blue.inverted),
    );

    // Buzzer (PWM slice 5, channel A)
    let buzzer = PwmBuzzer::new(Pwm::new_output_a(
        board.buzzer_slice,
        board.buzzer,
        PwmConfig::default(),
    ));

    // WS2812 matrix on PIO0
    let Pio {
        mut common, sm0, ..
    } = Pio::new(board.pio0, Irqs);
    let matrix = Ws2812Matrix::new(&mut common, sm0, board.matrix);
    info!("Feedback outputs initialized");

    spawner.spawn(tasks::console_tx_task(tx)).unwrap();
    spawner.spawn(tasks::effects_task(led, buzzer, matrix)).unwrap();
    spawner.spawn(tasks::session_task(rx, joystick, config)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
