mod console {
    use domovoy_cli::bootstrap::Home;
    use domovoy_cli::console::{Console, GREETING};
    use domovoy_cli::DefaultLocation;
    use domovoy_control::Inventory;
    use domovoy_nlp::{CommandTable, EngineConfig};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    const INVENTORY: &str = r#"{
        "locations": [{"id": 1, "title": "Кухня"}, {"id": 2, "title": "Спальня"}],
        "devices": [
            {"id": "D1", "deviceType": "switchBinary", "location": 1,
             "metrics": {"title": "Лампа", "level": "off"}},
            {"id": "D2", "deviceType": "switchBinary", "location": 2,
             "metrics": {"title": "Торшер", "level": "off"}}
        ]
    }"#;

    fn console(defaults: &[DefaultLocation]) -> anyhow::Result<Console> {
        let inventory = Inventory::from_json(INVENTORY)?;
        let home = Home::build(
            &inventory,
            CommandTable::builtin(),
            EngineConfig::default(),
            defaults,
        )?;
        Ok(Console::new(home, "console"))
    }

    #[test]
    fn session_over_stdin() -> TestResult {
        let console = console(&[])?;
        let input = "/start\n/rooms\nвключи лампу на кухне\n\nвыключи\n/devices\nспой песню\n";
        let mut output = Vec::new();
        console.run(input.as_bytes(), &mut output)?;

        let output = String::from_utf8(output)?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                GREETING,
                "Кухня",
                "Спальня",
                "Выполняю 'включи' на 'Лампа' в 'Кухня'",
                "Выполняю 'выключи' на 'Лампа' в 'Кухня'",
                "Лампа - 0",
                "Торшер - 0",
                "Не понял команду",
            ]
        );
        Ok(())
    }

    #[test]
    fn default_location_narrows_bare_device_words() -> TestResult {
        let console = console(&[DefaultLocation {
            sender: "console".into(),
            title: "Спальня".into(),
        }])?;

        assert_eq!(
            console.respond("включи торшер"),
            "Выполняю 'включи' на 'Торшер' в 'Спальня'"
        );
        assert_eq!(console.respond("/devices"), "Лампа - 0\nТоршер - 99");
        Ok(())
    }

    #[test]
    fn bare_device_word_toggles() -> TestResult {
        let console = console(&[])?;
        assert_eq!(console.respond("торшер"), "Переключаю устройство 'Торшер'");
        assert_eq!(console.respond("/devices"), "Лампа - 0\nТоршер - 99");
        Ok(())
    }
}
