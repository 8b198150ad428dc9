const MQTT_HOST: &str = "MQTT_HOST";

const DEFAULT_HOST: &str = "localhost";

pub fn get_mqtt_host() -> String {
    let host_from_env = std::env::var(MQTT_HOST);
    host_from_env.unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

const MQTT_PORT: &str = "MQTT_PORT";

const DEFAULT_PORT: u16 = 8883;

pub fn get_mqtt_port() -> u16 {
    let port_from_env = std::env::var(MQTT_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const MQTT_USER: &str = "MQTT_USER";

pub fn get_mqtt_user() -> Option<String> {
    std::env::var(MQTT_USER).ok()
}

const MQTT_PASSWORD: &str = "MQTT_PASSWORD";

pub fn get_mqtt_password() -> Option<String> {
    std::env::var(MQTT_PASSWORD).ok()
}

const MQTT_CLIENT_ID: &str = "MQTT_CLIENT_ID";

const DEFAULT_CLIENT_ID: &str = "leakwatch-hub";

pub fn get_mqtt_client_id() -> String {
    let id_from_env = std::env::var(MQTT_CLIENT_ID);
    id_from_env.unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string())
}

const GAS_THRESHOLD: &str = "GAS_THRESHOLD";

const DEFAULT_THRESHOLD: i64 = 1200;

pub fn get_threshold() -> i64 {
    let threshold_from_env = std::env::var(GAS_THRESHOLD);
    threshold_from_env.map_or(DEFAULT_THRESHOLD, |res| {
        res.parse().unwrap_or(DEFAULT_THRESHOLD)
    })
}
