//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port with a shared state handle, then
//! drives the client over real HTTP through `UreqTransport`. The state
//! handle lets each test seed domains, inject page failures, and inspect the
//! exact parameters the server received.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use mock_server::{Db, MockState, API_KEY, API_USER, ENDPOINT_PATH};
use namecheap_core::request::INJECTED_FIELDS;
use namecheap_core::{
    decode_response, ApiError, ApiRequest, ClientConfig, Command, CommandResponse, Credentials,
    DomainCreateOptions, DomainListQuery, Endpoint, HttpMethod, HttpTransport, NamecheapClient,
    Registrant, SortBy, TransportError, UreqTransport,
};
use tokio::sync::RwLock;

/// Start the mock server on a background runtime and return its address.
fn start_server(state: MockState) -> (SocketAddr, Db) {
    let db: Db = Arc::new(RwLock::new(state));
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let server_db = db.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, server_db).await
        })
        .unwrap();
    });

    (addr, db)
}

fn config(addr: SocketAddr, api_key: &str) -> ClientConfig {
    ClientConfig::new(Credentials::new(API_USER, api_key))
        .with_endpoint(Endpoint::Custom(format!("http://{addr}{ENDPOINT_PATH}")))
}

fn client(addr: SocketAddr) -> NamecheapClient {
    NamecheapClient::new(config(addr, API_KEY))
}

fn registrant() -> Registrant {
    Registrant {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        address1: "1 Navy Yard".to_string(),
        address2: "Suite 5".to_string(),
        city: "Arlington".to_string(),
        state_province: "VA".to_string(),
        postal_code: "22202".to_string(),
        country: "US".to_string(),
        phone: "+1.5555550100".to_string(),
        email_address: "grace@example.com".to_string(),
    }
}

#[test]
fn domain_lifecycle() {
    let (addr, db) = start_server(MockState::default());
    let client = client(addr).with_registrant(registrant());

    // Step 1: nothing registered yet.
    assert_eq!(client.domain_count().unwrap(), 0);
    let checks = client.check_domains(&["hopper.dev", "cobol.org"]).unwrap();
    assert_eq!(checks.len(), 2);
    assert!(checks.iter().all(|c| c.available));

    // Step 2: register one name with whoisguard and custom nameservers.
    let options = DomainCreateOptions {
        nameservers: vec!["ns1.hopper.dev".to_string(), "ns2.hopper.dev".to_string()],
        add_free_whoisguard: true,
        wg_enabled: true,
    };
    let created = client.create_domain("hopper.dev", 2, &options).unwrap();
    assert!(created.registered);
    assert_eq!(created.domain, "hopper.dev");
    assert!(created.whoisguard_enable);
    assert!((created.charged_amount - 17.76).abs() < 1e-9);

    // Step 3: the second attempt is refused remotely.
    let err = client.create_domain("hopper.dev", 1, &options).unwrap_err();
    match err {
        ApiError::Remote(errors) => assert!(errors.contains(2033409)),
        other => panic!("expected remote error, got {other:?}"),
    }

    // Step 4: details reflect the registration.
    let info = client.domain_info("hopper.dev").unwrap();
    assert_eq!(info.domain_name, "hopper.dev");
    assert_eq!(info.id, created.domain_id);
    assert!(info.whoisguard.is_enabled());
    assert!(!info.dns.is_using_our_dns);
    assert_eq!(info.dns.nameservers, vec!["ns1.hopper.dev", "ns2.hopper.dev"]);
    assert_eq!(info.details.expired_date, "01/15/2026");

    // Step 5: renew and observe the new expiry.
    let renewed = client.renew_domain("hopper.dev", 3).unwrap();
    assert!(renewed.renewed);
    assert_eq!(renewed.expire_date(), "01/15/2029");

    // Step 6: the listing and availability now include it.
    let page = client.list_domains(&DomainListQuery::default()).unwrap();
    assert_eq!(page.paging.total_items, 1);
    assert_eq!(page.domains[0].name, "hopper.dev");
    assert_eq!(page.domains[0].whois_guard, "ENABLED");
    let checks = client.check_domains(&["hopper.dev"]).unwrap();
    assert!(!checks[0].available);

    // Step 7: TLDs.
    let tlds = client.tld_list().unwrap();
    assert!(tlds.iter().any(|t| t.name == "com" && t.is_api_registerable));

    // Step 8: the create request carried the full contact block.
    let state = db.blocking_read();
    let create = &state.received[2];
    assert_eq!(create["RegistrantAddress2"], "Suite 5");
    assert_eq!(create["AuxBillingEmailAddress"], "grace@example.com");
    assert_eq!(create["Nameservers"], "ns1.hopper.dev,ns2.hopper.dev");
}

#[test]
fn unknown_domain_is_remote_error() {
    let (addr, _db) = start_server(MockState::with_domains(1));
    let err = client(addr).domain_info("missing.com").unwrap_err();
    let errors = err.remote_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].number, 2019166);
}

#[test]
fn wrong_api_key_is_remote_error() {
    let (addr, _db) = start_server(MockState::with_domains(3));
    let client = NamecheapClient::new(config(addr, "not-the-key"));
    let err = client.list_domains(&DomainListQuery::default()).unwrap_err();
    let errors = err.remote_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].number, 1011102);
}

#[test]
fn get_all_walks_every_page() {
    let (addr, db) = start_server(MockState::with_domains(250));
    let domains = client(addr).get_all_domains().unwrap();

    assert_eq!(domains.len(), 250);
    assert_eq!(domains[0].name, "domain-0000.com");
    assert_eq!(domains[249].name, "domain-0249.com");
    assert!(domains.windows(2).all(|w| w[0].id < w[1].id));

    let state = db.blocking_read();
    assert_eq!(state.requested_pages(), vec![1, 2, 3]);
    assert!(state.received.iter().all(|p| p["PageSize"] == "100"));
}

#[test]
fn get_all_exact_page_boundary() {
    let (addr, db) = start_server(MockState::with_domains(200));
    let domains = client(addr).get_all_domains().unwrap();
    assert_eq!(domains.len(), 200);
    assert_eq!(db.blocking_read().requested_pages(), vec![1, 2]);
}

#[test]
fn get_all_keeps_records_before_failed_page() {
    let mut state = MockState::with_domains(250);
    state.fail_page(2);
    let (addr, db) = start_server(state);

    let partial = client(addr).get_all_domains().unwrap_err();
    assert_eq!(partial.items.len(), 100);
    assert_eq!(partial.items[99].name, "domain-0099.com");
    assert!(matches!(
        partial.error,
        ApiError::Transport(TransportError::Status { status: 500, .. })
    ));
    assert_eq!(db.blocking_read().requested_pages(), vec![1, 2]);
}

#[test]
fn list_query_reaches_server() {
    let (addr, db) = start_server(MockState::with_domains(40));
    let page = client(addr)
        .list_domains(
            &DomainListQuery::page(2, 10)
                .with_search_term("domain-001")
                .with_sort_by(SortBy::NameDesc),
        )
        .unwrap();
    assert_eq!(page.paging.total_items, 10);
    assert_eq!(page.paging.current_page, 2);
    assert!(page.domains.is_empty());

    let state = db.blocking_read();
    let sent = &state.received[0];
    assert_eq!(sent["SearchTerm"], "domain-001");
    assert_eq!(sent["SortBy"], "NAME_DESC");
    assert_eq!(sent["Page"], "2");
}

#[test]
fn params_round_trip_with_injected_credentials() {
    let (addr, db) = start_server(MockState::default());
    let cfg = config(addr, API_KEY);

    let request = ApiRequest::post(Command::DomainsCheck)
        .param("DomainList", "a.com,b.net")
        .param("Note", "spaces & symbols = ok")
        .param("ApiKey", "overridden");
    let http = request.encode(&cfg).unwrap();
    let response = UreqTransport::new().execute(&http).unwrap();
    assert_eq!(response.status, 200);

    let state = db.blocking_read();
    let received = &state.received[0];
    assert_eq!(received["ApiKey"], API_KEY);
    assert_eq!(received["Command"], "namecheap.domains.check");
    assert_eq!(received["ClientIp"], "127.0.0.1");

    let echoed: BTreeMap<String, String> = received
        .iter()
        .filter(|(k, _)| !INJECTED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut expected = request.params().clone();
    expected.remove("ApiKey");
    assert_eq!(echoed, expected);
}

#[test]
fn get_request_carries_params_in_query_string() {
    let (addr, db) = start_server(MockState::with_domains(1));
    let cfg = config(addr, API_KEY);

    let http = ApiRequest::new(Command::DomainsCheck)
        .with_method(HttpMethod::Get)
        .param("DomainList", "domain-0000.com,free name.net")
        .encode(&cfg)
        .unwrap();
    assert_eq!(http.method, HttpMethod::Get);
    let response = UreqTransport::new().execute(&http).unwrap();
    let envelope = decode_response(Command::DomainsCheck, &response).unwrap();

    let CommandResponse::DomainCheck(results) = envelope.payload else {
        panic!("expected check results");
    };
    let available: Vec<(&str, bool)> = results
        .iter()
        .map(|r| (r.domain.as_str(), r.available))
        .collect();
    assert_eq!(
        available,
        vec![("domain-0000.com", false), ("free name.net", true)]
    );

    let state = db.blocking_read();
    assert_eq!(state.received[0]["ApiKey"], API_KEY);
    assert_eq!(state.received[0]["DomainList"], "domain-0000.com,free name.net");
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).tld_list().unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Io(_))));
}
