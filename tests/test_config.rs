use std::path::Path;

use courier::config::Config;

#[test]
fn test_config_both_sections_from_yaml() {
    let yaml = r#"
server:
  listen_addr: "0.0.0.0:8080"
  store_root: "data"
  max_inflight: 4
proxy:
  listen_addr: "0.0.0.0:8081"
  upstream_addr: "127.0.0.1:9000"
"#;

    let cfg = Config::from_yaml(yaml).unwrap();

    let server = cfg.server.unwrap();
    assert_eq!(server.listen_addr, "0.0.0.0:8080");
    assert_eq!(server.store_root, Path::new("data"));
    assert_eq!(server.max_inflight, 4);

    let proxy = cfg.proxy.unwrap();
    assert_eq!(proxy.listen_addr, "0.0.0.0:8081");
    assert_eq!(proxy.upstream_addr, "127.0.0.1:9000");
}

#[test]
fn test_config_server_defaults() {
    let yaml = r#"
server:
  listen_addr: "127.0.0.1:8080"
"#;

    let cfg = Config::from_yaml(yaml).unwrap();
    let server = cfg.server.unwrap();

    assert_eq!(server.store_root, Path::new("uploads"));
    assert_eq!(server.max_inflight, 10);
    assert!(cfg.proxy.is_none());
}

#[test]
fn test_config_proxy_only() {
    let yaml = r#"
proxy:
  listen_addr: "127.0.0.1:8081"
  upstream_addr: "http://localhost:3000"
"#;

    let cfg = Config::from_yaml(yaml).unwrap();

    assert!(cfg.server.is_none());
    assert_eq!(cfg.proxy.unwrap().upstream_addr, "http://localhost:3000");
}

#[test]
fn test_config_rejects_empty_file() {
    assert!(Config::from_yaml("{}").is_err());
}

#[test]
fn test_config_rejects_missing_upstream() {
    let yaml = r#"
proxy:
  listen_addr: "127.0.0.1:8081"
  upstream_addr: ""
"#;

    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_config_rejects_zero_capacity() {
    let yaml = r#"
server:
  listen_addr: "127.0.0.1:8080"
  max_inflight: 0
"#;

    assert!(Config::from_yaml(yaml).is_err());
}

// Environment scenarios live in one test: the process environment is
// shared across test threads.
#[test]
fn test_config_from_env() {
    unsafe {
        std::env::remove_var("SERVER_PORT");
        std::env::remove_var("PROXY_PORT");
        std::env::remove_var("TARGET_ADDRESS");
        std::env::remove_var("STORE_ROOT");
    }

    // Nothing configured is a startup error
    assert!(Config::from_env().is_err());

    // File service alone
    unsafe {
        std::env::set_var("SERVER_PORT", "8080");
    }
    let cfg = Config::from_env().unwrap();
    let server = cfg.server.unwrap();
    assert_eq!(server.listen_addr, "0.0.0.0:8080");
    assert_eq!(server.store_root, Path::new("uploads"));
    assert_eq!(server.max_inflight, 10);
    assert!(cfg.proxy.is_none());

    // Proxy port without an upstream address is fatal
    unsafe {
        std::env::set_var("PROXY_PORT", "8081");
    }
    assert!(Config::from_env().is_err());

    // Proxy with upstream
    unsafe {
        std::env::set_var("TARGET_ADDRESS", "127.0.0.1:9000");
    }
    let cfg = Config::from_env().unwrap();
    let proxy = cfg.proxy.unwrap();
    assert_eq!(proxy.listen_addr, "0.0.0.0:8081");
    assert_eq!(proxy.upstream_addr, "127.0.0.1:9000");

    unsafe {
        std::env::remove_var("SERVER_PORT");
        std::env::remove_var("PROXY_PORT");
        std::env::remove_var("TARGET_ADDRESS");
    }
}
