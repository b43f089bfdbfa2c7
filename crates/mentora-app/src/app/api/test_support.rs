//! Router fixtures shared by the handler tests.

use salvo::prelude::*;

use crate::app::api::routes;
use crate::config::{ConfigHandler, LoggingConfig, ScheduleConfig, ServerConfig, Settings};
use crate::store_handler::StoreHandler;
use mentora_store::InMemorySessionStore;

pub const HOST: &str = "http://127.0.0.1:5800";

pub fn url(path: &str) -> String {
    format!("{HOST}{path}")
}

fn settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        schedule: ScheduleConfig {
            timezone: "UTC".to_string(),
        },
    }
}

pub fn service(store: InMemorySessionStore) -> Service {
    let router = Router::new()
        .hoop(StoreHandler { store })
        .hoop(ConfigHandler {
            settings: settings(),
        })
        .push(routes());
    Service::new(router)
}
