//! Integration tests for statement logging.

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        fmt,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use litecell::OpenOptions;
    use log::LevelFilter;
    use tracing::{
        Event, Level, Metadata, Subscriber, dispatcher,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };

    #[derive(Clone, Default)]
    struct CapturingSubscriber {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedEvent {
        level: Level,
        fields: HashMap<String, String>,
    }

    impl CapturingSubscriber {
        fn events(&self) -> Vec<CapturedEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    struct FieldVisitor<'a> {
        fields: &'a mut HashMap<String, String>,
    }

    impl Visit for FieldVisitor<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    impl Subscriber for CapturingSubscriber {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _attrs: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            // Only statement events; connection setup traces are not of interest.
            if event.metadata().target() != "query" {
                return;
            }
            let mut fields = HashMap::new();
            let mut visitor = FieldVisitor {
                fields: &mut fields,
            };
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    fn capture(options: OpenOptions, sql: &[&str]) -> anyhow::Result<Vec<CapturedEvent>> {
        let subscriber = CapturingSubscriber::default();
        let dispatch = dispatcher::Dispatch::new(subscriber.clone());
        let _guard = dispatcher::set_default(&dispatch);

        let conn = options.open_in_memory()?;
        conn.execute_batch("CREATE TABLE t (x INTEGER)")?;
        for q in sql {
            let mut stmt = conn.prepare(q)?;
            while stmt.step()? {}
        }
        drop(conn);
        drop(_guard);

        Ok(subscriber.events())
    }

    #[test]
    fn logs_at_statements_level() -> anyhow::Result<()> {
        let options = OpenOptions::new()
            .log_statements(LevelFilter::Info)
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(60));

        let events = capture(
            options,
            &["INSERT INTO t VALUES (1), (2)", "SELECT x FROM t"],
        )?;
        assert_eq!(events.len(), 2);

        let insert = &events[0];
        assert_eq!(insert.level, Level::INFO);
        assert_eq!(insert.fields.get("rows_affected").unwrap(), "2");
        assert_eq!(insert.fields.get("rows_returned").unwrap(), "0");

        let select = &events[1];
        assert_eq!(select.fields.get("rows_returned").unwrap(), "2");
        assert_eq!(select.fields.get("rows_affected").unwrap(), "0");
        assert_eq!(select.fields.get("summary").unwrap(), "SELECT x FROM t");
        Ok(())
    }

    #[test]
    fn logs_at_slow_level() -> anyhow::Result<()> {
        let options = OpenOptions::new()
            .log_statements(LevelFilter::Info)
            .log_slow_statements(LevelFilter::Warn, Duration::ZERO);

        let events = capture(options, &["UPDATE t SET x = 1"])?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::WARN);
        Ok(())
    }

    #[test]
    fn abandoned_statements_are_logged_on_drop() -> anyhow::Result<()> {
        let subscriber = CapturingSubscriber::default();
        let dispatch = dispatcher::Dispatch::new(subscriber.clone());
        let _guard = dispatcher::set_default(&dispatch);

        let conn = OpenOptions::new()
            .log_statements(LevelFilter::Debug)
            .open_in_memory()?;
        let mut stmt = conn.prepare("SELECT value FROM json_each('[1, 2, 3]')")?;
        assert!(stmt.step()?);
        assert!(subscriber.events().is_empty());
        drop(stmt);

        let events = subscriber.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].fields.get("rows_returned").unwrap(), "1");
        Ok(())
    }

    #[test]
    fn off_disables_logging() -> anyhow::Result<()> {
        let options = OpenOptions::new()
            .log_statements(LevelFilter::Off)
            .log_slow_statements(LevelFilter::Off, Duration::ZERO);

        let events = capture(options, &["SELECT 1"])?;
        assert!(events.is_empty());
        Ok(())
    }
}
