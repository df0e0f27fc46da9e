use log::Level;

/// Narrow logging capability handed to the engine. The process-wide logger
/// setup stays with the binary.
pub trait LogSink {
    fn emit(&self, level: Level, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn emit(&self, level: Level, message: &str) {
        log::log!(target: "xrename", level, "{message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::LogSink;
    use log::Level;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    pub(crate) struct MemorySink {
        records: RefCell<Vec<(Level, String)>>,
    }

    impl MemorySink {
        pub(crate) fn messages(&self, level: Level) -> Vec<String> {
            self.records
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl LogSink for MemorySink {
        fn emit(&self, level: Level, message: &str) {
            self.records.borrow_mut().push((level, message.to_string()));
        }
    }
}
