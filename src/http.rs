use std::error::Error;
use std::io::Read;
use std::net::ToSocketAddrs;
use std::sync::{Arc, RwLock};

use json::object;
use log::error;
use tiny_http::{Method, Request, Response};

use crate::{FlashConfig, Led};

const HTML: &str = include_str!("home.html");

pub struct Server(tiny_http::Server);

impl Server {
    pub fn new<A>(addr: A) -> Result<Server, Box<dyn Error + Send + Sync + 'static>>
    where
        A: ToSocketAddrs,
    {
        tiny_http::Server::http(addr).map(Server)
    }

    /// Serves the control panel. This is the one thread that mutates the
    /// configuration and drives the LED, so requests apply strictly in
    /// sequence.
    pub fn handle_requests(&self, state: Arc<RwLock<FlashConfig>>, mut led: Led) {
        let html_content = "Content-type: text/html; charset=utf-8"
            .parse::<tiny_http::Header>()
            .unwrap();
        let json_content = "Content-type: application/json; charset=utf-8"
            .parse::<tiny_http::Header>()
            .unwrap();
        let back_home = "Location: /".parse::<tiny_http::Header>().unwrap();

        for mut request in self.0.incoming_requests() {
            // Owned copies so the body can be read inside the POST arms.
            let method = request.method().clone();
            let url = request.url().to_string();
            let response = match (method, url.as_str()) {
                (Method::Get, "/") => {
                    let config = { *state.read().unwrap() };
                    Response::from_string(render_home(&config)).with_header(html_content.clone())
                }
                (Method::Get, "/led.json") => {
                    let config = { *state.read().unwrap() };
                    let obj = object! {
                        enabled: config.enabled(),
                        flash_rate_hz: config.flash_rate_hz(),
                    };
                    let body = json::stringify_pretty(obj, 2);
                    Response::from_string(body).with_header(json_content.clone())
                }
                (Method::Post, "/toggle") => {
                    let body = read_body(&mut request);
                    let config = {
                        let mut config = state.write().unwrap();
                        config.set_enabled(parse_enabled(form_value(&body, "enabled")));
                        *config
                    };
                    update_led(&mut led, &config);
                    Response::from_string("")
                        .with_status_code(303)
                        .with_header(back_home.clone())
                }
                (Method::Post, "/rate") => {
                    let body = read_body(&mut request);
                    let config = {
                        let mut config = state.write().unwrap();
                        config.set_flash_rate(form_value(&body, "rate"));
                        *config
                    };
                    update_led(&mut led, &config);
                    Response::from_string("")
                        .with_status_code(303)
                        .with_header(back_home.clone())
                }
                _ => Response::from_string("Not found").with_status_code(404),
            };

            // Ignoring I/O errors that occur here so that we don't take down the process if there
            // is an issue sending the response.
            let _ = request.respond(response);
        }
    }

    pub fn shutdown(&self) {
        self.0.unblock();
    }
}

fn update_led(led: &mut Led, config: &FlashConfig) {
    // The operator never sees hardware errors; log and carry on.
    if let Err(err) = led.apply(config) {
        error!("unable to update LED: {}", err);
    }
}

fn read_body(request: &mut Request) -> String {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    body
}

fn form_value<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    body.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == key => Some(v),
            _ => None,
        }
    })
}

// An unchecked checkbox is simply absent from the form body.
fn parse_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("on") | Some("true") | Some("1"))
}

fn render_home(config: &FlashConfig) -> String {
    HTML.replace("$checked$", if config.enabled() { "checked" } else { "" })
        .replace("$rate$", &format!("{:.1}", config.flash_rate_hz()))
        .replace("$enabled_label$", &format!("On: {}", config.enabled()))
        .replace(
            "$rate_label$",
            &format!("Rate: {:.1} Hz", config.flash_rate_hz()),
        )
}
