use std::sync::Arc;
use std::time::{Duration, Instant};

use studynotes_engine::{EngineEvent, EngineHandle, ReqwestNotesApi, ServiceSettings, TimerKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn wait_for(engine: &EngineHandle, deadline: Duration) -> Vec<EngineEvent> {
    let start = Instant::now();
    let mut events = Vec::new();
    while start.elapsed() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(20)) {
            events.push(event);
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn health_and_timers_come_back_as_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"latex_available":false}"#))
        .mount(&server)
        .await;

    let api = ReqwestNotesApi::new(ServiceSettings {
        origin: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("client");
    let engine = EngineHandle::new(Arc::new(api)).expect("engine");

    engine.schedule(TimerKind::ProgressReset, Duration::from_millis(10));
    engine.check_health();

    let events = tokio::task::spawn_blocking(move || wait_for(&engine, Duration::from_millis(1500)))
        .await
        .unwrap();

    assert!(events.contains(&EngineEvent::TimerElapsed(TimerKind::ProgressReset)));
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::HealthChecked(Ok(health)) if !health.latex_available
    )));
}
