pub fn default_server_binding_addr() -> String {
    "0.0.0.0:5000".to_string()
}
