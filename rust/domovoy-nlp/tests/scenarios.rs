//! End-to-end resolution scenarios: room matching, follow-ups, expiry,
//! default toggles, retrying when a verb does not fit a device and
//! per-sender serialization.
mod scenarios {
    use std::sync::{Arc, mpsc};
    use std::time::{Duration, Instant};

    use domovoy_nlp::{CommandKind, EVERYWHERE, Engine, NlpError};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn kitchen() -> Result<Engine, NlpError> {
        let engine = Engine::default();
        engine.register_location(7, "кухня");
        engine.register_device("D1", "лампа", "switchBinary", 7)?;
        engine.register_device("D2", "лампа", "switchBinary", EVERYWHERE)?;
        Ok(engine)
    }

    fn kind(resolution: &domovoy_nlp::Resolution) -> Option<CommandKind> {
        resolution.command.as_ref().map(|def| def.command.kind())
    }

    #[test]
    fn room_word_picks_the_lamp_in_that_room() -> TestResult {
        let engine = kitchen()?;
        let resolution = engine
            .process_phrase("включи лампу в кухне", "alice")
            .ok_or("phrase should resolve")?;

        assert_eq!(resolution.locations, vec![7]);
        assert_eq!(resolution.devices, vec!["D1".to_string()]);
        assert_eq!(kind(&resolution), Some(CommandKind::On));
        Ok(())
    }

    #[test]
    fn follow_up_reuses_fresh_context() -> TestResult {
        let engine = kitchen()?;
        let start = Instant::now();
        engine
            .process_phrase_at("включи лампу в кухне", "alice", start)
            .ok_or("first phrase should resolve")?;

        let resolution = engine
            .process_phrase_at("выключи", "alice", start + Duration::from_secs(30))
            .ok_or("follow-up should resolve from context")?;

        assert_eq!(resolution.devices, vec!["D1".to_string()]);
        assert_eq!(resolution.locations, vec![7]);
        assert_eq!(kind(&resolution), Some(CommandKind::Off));
        assert!(resolution.from_context());
        Ok(())
    }

    #[test]
    fn follow_up_after_expiry_fails() -> TestResult {
        let engine = kitchen()?;
        let start = Instant::now();
        engine
            .process_phrase_at("включи лампу в кухне", "alice", start)
            .ok_or("first phrase should resolve")?;

        let late = start + Duration::from_secs(61);
        assert_eq!(engine.process_phrase_at("выключи", "alice", late), None);
        Ok(())
    }

    #[test]
    fn context_belongs_to_one_sender() -> TestResult {
        let engine = kitchen()?;
        engine
            .process_phrase("включи лампу в кухне", "alice")
            .ok_or("first phrase should resolve")?;
        assert_eq!(engine.process_phrase("выключи", "bob"), None);
        Ok(())
    }

    #[test]
    fn context_without_command_word_is_not_acted_upon() -> TestResult {
        let engine = kitchen()?;
        let start = Instant::now();
        engine
            .process_phrase_at("включи лампу в кухне", "alice", start)
            .ok_or("first phrase should resolve")?;
        assert_eq!(
            engine.process_phrase_at("ну и что", "alice", start + Duration::from_secs(5)),
            None
        );
        Ok(())
    }

    #[test]
    fn device_without_verb_asks_for_default_toggle() -> TestResult {
        let engine = kitchen()?;
        let resolution = engine
            .process_phrase("лампа на кухне", "alice")
            .ok_or("phrase should resolve")?;

        assert_eq!(resolution.devices, vec!["D1".to_string()]);
        assert_eq!(resolution.command, None);
        Ok(())
    }

    #[test]
    fn unknown_vocabulary_resolves_to_nothing() -> TestResult {
        let engine = kitchen()?;
        assert_eq!(engine.process_phrase("какая завтра погода", "alice"), None);
        assert_eq!(engine.process_phrase("", "alice"), None);
        Ok(())
    }

    #[test]
    fn verb_that_does_not_fit_moves_to_next_device() -> TestResult {
        let engine = Engine::default();
        engine.register_device("A", "верхний свет", "switchBinary", EVERYWHERE)?;
        engine.register_device("B", "свет", "switchMultilevel", EVERYWHERE)?;

        let resolution = engine
            .process_phrase("верхний свет ярче", "alice")
            .ok_or("dimmer should be chosen")?;

        assert_eq!(resolution.devices, vec!["B".to_string()]);
        assert_eq!(kind(&resolution), Some(CommandKind::DimmerUp));
        assert_eq!(resolution.score, 1);
        Ok(())
    }

    #[test]
    fn verb_that_fits_no_device_fails() -> TestResult {
        let engine = Engine::default();
        engine.register_device("A", "верхний свет", "switchBinary", EVERYWHERE)?;
        assert_eq!(engine.process_phrase("верхний свет ярче", "alice"), None);
        Ok(())
    }

    #[test]
    fn rgb_command_reaches_rgb_strip() -> TestResult {
        let engine = Engine::default();
        engine.register_location(2, "гостиная");
        engine.register_device("L1", "лента", "switchRGBW", 2)?;
        engine.register_device("L2", "лента", "switchBinary", EVERYWHERE)?;

        let resolution = engine
            .process_phrase("лента в гостиной синий", "alice")
            .ok_or("phrase should resolve")?;
        assert_eq!(resolution.devices, vec!["L1".to_string()]);
        assert_eq!(
            resolution.command.map(|def| def.command),
            Some(domovoy_nlp::Command::Rgb(domovoy_nlp::Rgb { r: 0, g: 0, b: 100 }))
        );
        Ok(())
    }

    #[test]
    fn same_sender_waits_for_its_context() -> TestResult {
        let engine = Arc::new(kitchen()?);
        let slot = engine.contexts().slot("alice");
        let guard = slot.lock();

        let (done, finished) = mpsc::channel();
        let worker = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let resolution = engine.process_phrase("включи лампу в кухне", "alice");
                let _ = done.send(resolution);
            })
        };

        assert!(finished.recv_timeout(Duration::from_millis(200)).is_err());

        drop(guard);
        let resolution = finished
            .recv_timeout(Duration::from_secs(5))?
            .ok_or("phrase should resolve once the context is free")?;
        assert_eq!(resolution.devices, vec!["D1".to_string()]);
        worker.join().map_err(|_| "worker panicked")?;
        Ok(())
    }

    #[test]
    fn concurrent_senders_keep_separate_contexts() -> TestResult {
        let engine = Arc::new(kitchen()?);
        engine.register_location(3, "спальня");
        engine.register_device("D3", "лампа", "switchBinary", 3)?;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let sender = format!("sender-{i}");
                    let room = if i % 2 == 0 { "кухне" } else { "спальне" };
                    engine
                        .process_phrase(&format!("включи лампу в {room}"), &sender)
                        .and_then(|_| engine.process_phrase("выключи", &sender))
                        .map(|r| (i, r.devices))
                })
            })
            .collect();

        for handle in handles {
            let (i, devices) = handle
                .join()
                .map_err(|_| "worker panicked")?
                .ok_or("both phrases should resolve")?;
            let expected = if i % 2 == 0 { "D1" } else { "D3" };
            assert_eq!(devices, vec![expected.to_string()]);
        }
        Ok(())
    }
}
