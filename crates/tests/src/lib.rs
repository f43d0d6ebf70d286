//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> Session -> MockGateway 的端到端流程
//! - HTTP 命令流程（无需真实仿真器）

#[cfg(test)]
mod contract_tests {
    use contracts::{Drive, InstanceSuffix, SuffixPool};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_suffix_pool_order() {
        let mut pool = SuffixPool::with_capacity(3);
        let taken: Vec<_> = std::iter::from_fn(|| pool.allocate()).collect();
        let names: Vec<_> = taken.iter().map(InstanceSuffix::as_str).collect();
        assert_eq!(names, vec!["", "#0", "#1"]);
    }

    #[test]
    fn test_drive_signs() {
        assert_eq!(Drive::Forward.wheel_velocities(2.0), [-2.0; 4]);
        assert_eq!(Drive::Backward.wheel_velocities(2.0), [2.0; 4]);
        assert_eq!(Drive::Stop.wheel_velocities(2.0), [0.0; 4]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ParameterLookup, Part, Position};
    use robot_control::{ControlError, Session, SessionSettings};
    use sim_gateway::{GatewayCall, MockGateway, SimulationState};

    const CONFIG: &str = r#"
[simulator]
default_scene = "Arena.ttt"
scenes_dir = "Scenes"

[motion]
noise_std_dev = 0.0
noise_seed = 11
max_polls = 2000

[fleet]
suffix_pool_size = 3

[lidar]
settle_ms = 1
"#;

    async fn session_from_config() -> Session<MockGateway> {
        let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let mut session = Session::new(MockGateway::new(), SessionSettings::from(&config));
        session.connect("127.0.0.1", 19997).await.unwrap();
        session
    }

    /// Config -> Session -> fleet of two -> closed-loop motion on each
    #[tokio::test]
    async fn test_e2e_config_to_motion() {
        let mut session = session_from_config().await;
        assert_eq!(session.gateway().scene().as_deref(), Some("Scenes/Arena.ttt"));

        let first = session.add_robot("youBot.ttm").await.unwrap();
        let second = session.add_robot("youBot.ttm").await.unwrap();
        assert_eq!((first.suffix.as_str(), second.suffix.as_str()), ("", "#0"));
        assert_eq!(
            session.gateway().loaded_models(),
            vec!["Models/youBot.ttm".to_string(); 2]
        );

        session.start_simulation().await.unwrap();
        let moved = session.move_distance(1, 0.3, 1.0, None).await.unwrap();
        let turned = session.turn_angle(0, 0.2, 1.0, None).await.unwrap();

        assert!(moved.is_converged());
        assert!(moved.achieved() >= 0.3);
        assert!(turned.is_converged());

        // Copies start side by side along y; only robot 1 left its spot
        let target_of = |index| {
            let robot = session.fleet().robot(index).unwrap();
            session
                .gateway()
                .position_of(robot.handles().get(Part::PositionTarget))
                .unwrap()
        };
        assert_eq!(target_of(0), Position::new(0.0, 0.0, 0.0));
        assert_ne!(target_of(1), Position::new(0.0, 1.0, 0.0));

        // Turn script of robot 0 is the unsuffixed one
        assert!(session.gateway().calls().iter().any(|c| matches!(
            c,
            GatewayCall::CallScript { script, function, .. } if script == "youBot_ref" && function == "Turn"
        )));

        session.stop_simulation().await.unwrap();
        assert_eq!(session.gateway().simulation_state(), SimulationState::Stopped);
    }

    #[tokio::test]
    async fn test_e2e_pool_size_from_config() {
        let mut session = session_from_config().await;
        for _ in 0..3 {
            session.add_robot("youBot.ttm").await.unwrap();
        }

        let err = session.add_robot("youBot.ttm").await.unwrap_err();

        assert!(matches!(err, ControlError::SuffixPoolExhausted { capacity: 3 }));
        assert_eq!(session.robots().len(), 3);
    }

    #[tokio::test]
    async fn test_e2e_scene_reload_restarts_fleet() {
        let mut session = session_from_config().await;
        session.add_robot("youBot.ttm").await.unwrap();
        session.add_robot("youBot.ttm").await.unwrap();

        session.load_scene("Arena.ttt").await.unwrap();
        assert!(session.robots().is_empty());

        let again = session.add_robot("youBot.ttm").await.unwrap();
        assert_eq!(again.index, 0);
        assert_eq!(again.suffix.as_str(), "");
    }

    #[tokio::test]
    async fn test_e2e_sensors() {
        let mut session = session_from_config().await;
        session.add_robot("youBot.ttm").await.unwrap();

        let image = session.capture_image(0).await.unwrap();
        let depth = session.capture_depth(0).await.unwrap();
        let ranges = session.lidar_scan(0).await.unwrap();
        assert_eq!(image.dimensions(), (640, 480));
        assert_eq!(depth.len(), 480);
        assert!(!ranges.is_empty());

        let set = session
            .set_parameter(0, "camera-depth", "far-clipping-plane", 3.5)
            .await
            .unwrap();
        assert!(set.is_found());
        let value = session
            .get_parameter(0, "camera-depth", "far-clipping-plane")
            .await
            .unwrap();
        assert_eq!(value.found().map(|v| v.as_f64()), Some(3.5));

        let missing = session
            .get_parameter(0, "camera-depth", "gain")
            .await
            .unwrap();
        assert_eq!(missing, ParameterLookup::NotFound);
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use robot_control::{Session, SessionSettings};
    use serde_json::Value;
    use sim_gateway::{MockGateway, SimulationState};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    type Shared = dispatcher::SharedSession<MockGateway>;

    async fn call(session: &Shared, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = dispatcher::router(session.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    /// Full command sequence a client script would issue
    #[tokio::test]
    async fn test_http_command_session() {
        let mut settings = SessionSettings::default();
        settings.template.noise_std_dev = 0.0;
        let session: Shared = Arc::new(Mutex::new(Session::new(MockGateway::new(), settings)));

        let steps = [
            (Method::POST, "/start-v-rep-server?ip=127.0.0.1&port=19997"),
            (Method::POST, "/start-simulation"),
            (Method::POST, "/add-robot?model=youBot.ttm"),
            (Method::POST, "/add-robot?model=youBot.ttm"),
            (Method::POST, "/right?robot-id=1&speed=1.5"),
            (Method::POST, "/stop?robot-id=1"),
            (Method::POST, "/move?robot-id=0&delta=0.2"),
            (Method::POST, "/pause-simulation"),
        ];
        for (method, uri) in steps {
            let (status, body) = call(&session, method, uri).await;
            assert_eq!(
                status,
                StatusCode::OK,
                "{uri}: {}",
                String::from_utf8_lossy(&body)
            );
        }

        let (status, body) = call(&session, Method::GET, "/robots").await;
        assert_eq!(status, StatusCode::OK);
        let robots: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(robots[1]["suffix"], "#0");
        assert_eq!(
            session.lock().await.gateway().simulation_state(),
            SimulationState::Paused
        );
    }

    #[tokio::test]
    async fn test_http_reconnect_drops_fleet() {
        let session: Shared = Arc::new(Mutex::new(Session::new(
            MockGateway::new(),
            SessionSettings::default(),
        )));

        call(&session, Method::POST, "/start-v-rep-server?ip=127.0.0.1&port=19997").await;
        call(&session, Method::POST, "/add-robot?model=youBot.ttm").await;
        let (status, _) = call(&session, Method::GET, "/get-standard-deviation/0").await;
        assert_eq!(status, StatusCode::OK);

        call(&session, Method::POST, "/start-v-rep-server?ip=127.0.0.1&port=19997").await;
        let (status, _) = call(&session, Method::GET, "/get-standard-deviation/0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
