use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use std::{io, process, thread};

use log::{error, info, LevelFilter};
use rppal::gpio::{Gpio, OutputPin};
use syslog::Facility;

use led_control_panel::{http, FlashConfig, Led};

const LED_PIN: u8 = 17; // header pin 11
const ONE_SECOND: Duration = Duration::from_secs(1);
const SERVER_ADDR: (&str, u16) = ("0.0.0.0", 8080);

fn main() -> Result<(), io::Error> {
    if let Err(err) = syslog::init(Facility::LOG_USER, LevelFilter::Info, Some("led-control-panel"))
    {
        eprintln!("unable to initialise syslog logging: {}", err);
    }

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))?;

    // An unavailable pin means a wiring or configuration fault that software
    // can't fix, so there is no point carrying on.
    let mut led = match setup_gpio() {
        Ok(pin) => Led::new(pin),
        Err(err) => {
            error!("unable to set up GPIO {}: {}", LED_PIN, err);
            process::exit(1);
        }
    };

    let state = Arc::new(RwLock::new(FlashConfig::default()));

    // Drive the LED to its rest state before taking requests.
    let config = { *state.read().unwrap() };
    if let Err(err) = led.apply(&config) {
        error!("unable to apply initial LED state: {}", err);
    }

    let server = match http::Server::new(SERVER_ADDR) {
        Ok(server) => Arc::new(server),
        Err(err) => {
            error!(
                "unable to start http server on {}:{}: {}",
                SERVER_ADDR.0, SERVER_ADDR.1, err
            );
            process::exit(1);
        }
    };
    info!("http server running on {}:{}", SERVER_ADDR.0, SERVER_ADDR.1);

    // Handle HTTP requests; this thread is the only writer of state and the
    // sole driver of the LED.
    let handler = {
        let state = Arc::clone(&state);
        let server = Arc::clone(&server);
        thread::spawn(move || {
            server.handle_requests(state, led);
            info!("server thread exiting");
        })
    };

    // Wait for signals to exit
    while !term.load(Ordering::Relaxed) {
        thread::sleep(ONE_SECOND);
    }
    info!("shutting down");
    server.shutdown();
    let _ = handler.join();

    Ok(())
}

fn setup_gpio() -> rppal::gpio::Result<OutputPin> {
    let gpio = Gpio::new()?;
    let led_pin = gpio.get(LED_PIN)?.into_output();
    Ok(led_pin)
}
