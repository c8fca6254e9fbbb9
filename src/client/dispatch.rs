use std::sync::Arc;

use log::{debug, trace, warn};
use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    report::{Class, GenericReport, Sky, Tpv, Version},
    runtime::Runtime,
};

/// Report handler. Invoked synchronously on the session thread.
pub type Callback<T> = Box<dyn FnMut(T) + Send>;

/// Outcome of dispatching one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank line, nothing to do
    Empty,

    /// Report decoded (and handed to its callback, if any)
    Decoded(Class),

    /// Envelope decoded but the typed report did not: dropped and counted
    Rejected(Class),

    /// Class we do not implement: dropped and counted
    Unknown(String),
}

/// Routes raw report lines to at most one callback per [Class].
pub struct Dispatcher {
    runtime: Arc<Runtime>,
    version: Option<Callback<Version>>,
    sky: Option<Callback<Sky>>,
    tpv: Option<Callback<Tpv>>,
    unknown: Option<Callback<String>>,
}

impl Dispatcher {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            version: None,
            sky: None,
            tpv: None,
            unknown: None,
        }
    }

    pub fn runtime(&self) -> Arc<Runtime> {
        Arc::clone(&self.runtime)
    }

    pub fn on_version<F: FnMut(Version) + Send + 'static>(&mut self, callback: F) {
        self.version = Some(Box::new(callback));
    }

    pub fn on_sky<F: FnMut(Sky) + Send + 'static>(&mut self, callback: F) {
        self.sky = Some(Box::new(callback));
    }

    pub fn on_tpv<F: FnMut(Tpv) + Send + 'static>(&mut self, callback: F) {
        self.tpv = Some(Box::new(callback));
    }

    /// Observe classes we do not implement. Receives the class tag.
    pub fn on_unknown<F: FnMut(String) + Send + 'static>(&mut self, callback: F) {
        self.unknown = Some(Box::new(callback));
    }

    /// Classify and dispatch a single line.
    ///
    /// ## Returns
    /// - Err(Error::Decode) when the line is not a report envelope at all
    /// - Ok(Dispatch) otherwise, including for reports we drop
    pub fn dispatch(&mut self, line: &[u8]) -> Result<Dispatch> {
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Dispatch::Empty);
        }

        let generic = GenericReport::decode(line).map_err(Error::Decode)?;

        let Some(class) = Class::from_tag(&generic.class) else {
            debug!(
                "{} - ignoring unimplemented report class {}",
                self.runtime.timestamp(),
                generic.class
            );

            self.runtime.unknown();

            if let Some(callback) = &mut self.unknown {
                callback(generic.class.clone());
            }

            return Ok(Dispatch::Unknown(generic.class));
        };

        let decoded = match class {
            Class::Version => deliver(line, &mut self.version),
            Class::Sky => deliver(line, &mut self.sky),
            Class::Tpv => deliver(line, &mut self.tpv),
        };

        match decoded {
            Ok(_) => {
                trace!("{} - {} report", self.runtime.timestamp(), class);
                self.runtime.received(class);
                Ok(Dispatch::Decoded(class))
            },
            Err(e) => {
                warn!(
                    "{} - dropping malformed {} report: {}",
                    self.runtime.timestamp(),
                    class,
                    e
                );
                self.runtime.rejected(class);
                Ok(Dispatch::Rejected(class))
            },
        }
    }
}

fn deliver<T: DeserializeOwned>(
    line: &[u8],
    callback: &mut Option<Callback<T>>,
) -> serde_json::Result<()> {
    let report = serde_json::from_slice::<T>(line)?;

    if let Some(callback) = callback {
        callback(report);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    use std::sync::Mutex;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(Runtime::default()))
    }

    #[test]
    fn routes_each_class_to_its_callback() {
        let mut dispatcher = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));

        {
            let seen = Arc::clone(&seen);
            dispatcher.on_version(move |v| seen.lock().unwrap().push(format!("version {}", v.release)));
        }
        {
            let seen = Arc::clone(&seen);
            dispatcher.on_sky(move |sky| {
                seen.lock()
                    .unwrap()
                    .push(format!("sky {}", sky.satellites.len()))
            });
        }
        {
            let seen = Arc::clone(&seen);
            dispatcher.on_tpv(move |tpv| seen.lock().unwrap().push(format!("tpv {}", tpv.mode)));
        }

        let lines = [
            r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#,
            r#"{"class":"SKY","satellites":[{"PRN":1,"used":true},{"PRN":2,"used":false}]}"#,
            r#"{"class":"TPV","mode":2}"#,
        ];

        for line in lines {
            assert!(matches!(
                dispatcher.dispatch(line.as_bytes()),
                Ok(Dispatch::Decoded(_))
            ));
        }

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["version 3.25", "sky 2", "tpv 2"]
        );

        let runtime = dispatcher.runtime();
        for class in Class::ALL {
            assert_eq!(runtime.reports(class), 1);
        }
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut dispatcher = dispatcher();
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));

        {
            let first = Arc::clone(&first);
            dispatcher.on_tpv(move |_| *first.lock().unwrap() += 1);
        }
        {
            let second = Arc::clone(&second);
            dispatcher.on_tpv(move |_| *second.lock().unwrap() += 1);
        }

        dispatcher.dispatch(br#"{"class":"TPV","mode":3}"#).unwrap();

        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn unregistered_class_is_still_decoded() {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch(br#"{"class":"SKY","satellites":[]}"#).unwrap(),
            Dispatch::Decoded(Class::Sky)
        );
        assert_eq!(dispatcher.runtime().reports(Class::Sky), 1);
    }

    #[test]
    fn unknown_class_invokes_no_report_callback() {
        let mut dispatcher = dispatcher();
        let called = Arc::new(Mutex::new(false));
        let unknown = Arc::new(Mutex::new(Vec::new()));

        {
            let called = Arc::clone(&called);
            dispatcher.on_tpv(move |_| *called.lock().unwrap() = true);
        }
        {
            let called = Arc::clone(&called);
            dispatcher.on_sky(move |_| *called.lock().unwrap() = true);
        }
        {
            let unknown = Arc::clone(&unknown);
            dispatcher.on_unknown(move |class| unknown.lock().unwrap().push(class));
        }

        let outcome = dispatcher
            .dispatch(br#"{"class":"DEVICES","devices":[]}"#)
            .unwrap();

        assert_eq!(outcome, Dispatch::Unknown("DEVICES".to_string()));
        assert!(!*called.lock().unwrap());
        assert_eq!(*unknown.lock().unwrap(), vec!["DEVICES".to_string()]);
        assert_eq!(dispatcher.runtime().unknown_reports(), 1);
    }

    #[test]
    fn malformed_typed_report_is_counted_not_fatal() {
        let mut dispatcher = dispatcher();
        let delivered = Arc::new(Mutex::new(Vec::new()));

        {
            let delivered = Arc::clone(&delivered);
            dispatcher.on_tpv(move |tpv| delivered.lock().unwrap().push(tpv.mode));
        }

        // mode is required, and must be a number
        for line in [
            r#"{"class":"TPV","lat":1.0}"#,
            r#"{"class":"TPV","mode":"3D"}"#,
        ] {
            assert_eq!(
                dispatcher.dispatch(line.as_bytes()).unwrap(),
                Dispatch::Rejected(Class::Tpv)
            );
        }

        dispatcher.dispatch(br#"{"class":"TPV","mode":3}"#).unwrap();

        assert_eq!(*delivered.lock().unwrap(), vec![3]);
        assert_eq!(dispatcher.runtime().decode_failures(Class::Tpv), 2);
        assert_eq!(dispatcher.runtime().reports(Class::Tpv), 1);
    }

    #[yare::parameterized(
        garbage = { &b"not json\n"[..] },
        truncated = { &b"{\"class\":\"TPV\",\"mo\n"[..] },
        class_not_a_string = { &b"{\"class\":3}\n"[..] },
        array = { &b"[{\"class\":\"TPV\"}]\n"[..] },
    )]
    fn invalid_envelope_is_fatal(line: &[u8]) {
        let mut dispatcher = dispatcher();
        assert!(matches!(dispatcher.dispatch(line), Err(Error::Decode(_))));
    }

    #[yare::parameterized(
        missing_class = { &b"{\"mode\":3}\n"[..] },
        null_class = { &b"{\"class\":null}\n"[..] },
        null = { &b"null\n"[..] },
    )]
    fn untagged_report_is_unknown(line: &[u8]) {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch(line).unwrap(),
            Dispatch::Unknown(String::new())
        );
        assert_eq!(dispatcher.runtime().unknown_reports(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut dispatcher = dispatcher();
        assert_eq!(dispatcher.dispatch(b"\r\n").unwrap(), Dispatch::Empty);
        assert_eq!(dispatcher.dispatch(b"").unwrap(), Dispatch::Empty);
    }
}
