//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 端到端回放测试（corpus → pacer → endpoint → relay → broker）
//! - 两种 clamp 策略的边界行为对照

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_wire_version_pinned() {
        assert_eq!(contracts::WIRE_VERSION, "v1");
    }
}

#[cfg(test)]
mod schedule_tests {
    use std::time::{Duration, SystemTime};

    use contracts::{ClampPolicy, Corpus, Record};
    use pacer::Pacer;

    fn abc_corpus() -> Corpus {
        ["{\"v\":\"a\"}", "{\"v\":\"b\"}", "{\"v\":\"c\"}"]
            .into_iter()
            .map(Record::from)
            .collect()
    }

    fn payloads(batch: &contracts::Batch) -> Vec<String> {
        batch
            .iter()
            .map(|r| String::from_utf8(r.payload.to_vec()).unwrap())
            .collect()
    }

    /// The canonical 3-records-over-3-seconds schedule, polled every second.
    #[test]
    fn test_abc_schedule_exclude_final() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let p = Pacer::with_start_time(
            abc_corpus(),
            Duration::from_secs(3),
            ClampPolicy::ExcludeFinal,
            t0,
        )
        .unwrap();

        assert_eq!(
            payloads(&p.release_next_at(t0 + Duration::from_secs(1))),
            vec!["{\"v\":\"a\"}"]
        );
        assert_eq!(
            payloads(&p.release_next_at(t0 + Duration::from_secs(2))),
            vec!["{\"v\":\"b\"}"]
        );
        // target clamps to len-1 = 2, already at cursor: "c" is never released
        assert!(p.release_next_at(t0 + Duration::from_secs(3)).is_empty());
        assert!(p.release_next_at(t0 + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn test_abc_schedule_include_final() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let p = Pacer::with_start_time(
            abc_corpus(),
            Duration::from_secs(3),
            ClampPolicy::IncludeFinal,
            t0,
        )
        .unwrap();

        assert_eq!(
            payloads(&p.release_next_at(t0 + Duration::from_secs(1))),
            vec!["{\"v\":\"a\"}"]
        );
        assert_eq!(
            payloads(&p.release_next_at(t0 + Duration::from_secs(2))),
            vec!["{\"v\":\"b\"}"]
        );
        assert_eq!(
            payloads(&p.release_next_at(t0 + Duration::from_secs(3))),
            vec!["{\"v\":\"c\"}"]
        );
        assert!(p.release_next_at(t0 + Duration::from_secs(4)).is_empty());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use contracts::{ClampPolicy, RelayConfig};
    use corpus::CorpusLoader;
    use pacer::Pacer;
    use relay::{MemoryPublisher, RelayLoop};
    use server::DeliveryServer;
    use tokio_util::sync::CancellationToken;

    /// Write a small corpus directory and load it.
    fn load_abc_corpus(dir: &std::path::Path) -> contracts::Corpus {
        let mut f = std::fs::File::create(dir.join("events.json")).unwrap();
        f.write_all(br#"[{"v": "a"}, {"v": "b"}, {"v": "c"}]"#)
            .unwrap();
        CorpusLoader::load_from_dir(dir, "*.json").unwrap()
    }

    /// Full pipeline: corpus dir -> pacer -> HTTP endpoint -> relay -> broker.
    ///
    /// The pacer window is backdated slightly so each 1s poll lands safely
    /// inside its release second instead of on the boundary.
    async fn run_pipeline(policy: ClampPolicy) -> Vec<String> {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = load_abc_corpus(tmp.path());
        assert_eq!(corpus.len(), 3);

        let start = SystemTime::now() - Duration::from_millis(200);
        let pacer = Arc::new(
            Pacer::with_start_time(corpus, Duration::from_secs(3), policy, start).unwrap(),
        );

        let server = DeliveryServer::bind(0, pacer).await.unwrap();
        let addr = server.local_addr().unwrap();
        let server_shutdown = CancellationToken::new();
        let server_token = server_shutdown.clone();
        tokio::spawn(async move {
            server.serve(server_token).await.unwrap();
        });

        let publisher = MemoryPublisher::new("capture");
        let captured = publisher.captured();
        let config = RelayConfig {
            endpoint: format!("http://{addr}/v1/next"),
            frequency_secs: 1,
            run_length_secs: 4,
            ..RelayConfig::default()
        };

        let stats = RelayLoop::new(config, publisher)
            .unwrap()
            .run(CancellationToken::new())
            .await
            .unwrap();
        server_shutdown.cancel();

        assert_eq!(stats.iterations, 4);
        assert!(!stats.cancelled);

        let captured = captured.lock().unwrap();
        captured
            .iter()
            .map(|r| String::from_utf8(r.payload.to_vec()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_e2e_exclude_final_holds_last_record() {
        let published = run_pipeline(ClampPolicy::ExcludeFinal).await;
        assert_eq!(published, vec!["{\"v\":\"a\"}", "{\"v\":\"b\"}"]);
    }

    #[tokio::test]
    async fn test_e2e_include_final_drains_corpus() {
        let published = run_pipeline(ClampPolicy::IncludeFinal).await;
        assert_eq!(
            published,
            vec!["{\"v\":\"a\"}", "{\"v\":\"b\"}", "{\"v\":\"c\"}"]
        );
    }

    /// Blueprint loaded from disk drives the same wiring the CLI uses.
    #[tokio::test]
    async fn test_config_to_pipeline_smoke() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus_dir = tmp.path().join("data");
        std::fs::create_dir(&corpus_dir).unwrap();
        load_abc_corpus(&corpus_dir);

        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "[corpus]\ndir = \"{}\"\n\n[server]\nrun_length_secs = 3\n\n[broker]\nkind = \"memory\"\n",
                corpus_dir.display()
            ),
        )
        .unwrap();

        let blueprint = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        let corpus =
            CorpusLoader::load_from_dir(&blueprint.corpus.dir, &blueprint.corpus.glob).unwrap();
        assert_eq!(corpus.len(), 3);

        let pacer = Pacer::new(
            corpus,
            blueprint.server.run_length(),
            blueprint.server.clamp_policy,
        )
        .unwrap();
        // Window just opened: nothing released yet
        assert!(pacer.release_next().is_empty());
    }
}
