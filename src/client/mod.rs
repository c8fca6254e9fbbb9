use std::{
    io::{BufRead, BufReader, ErrorKind, Read, Write},
    net::{Shutdown, TcpStream},
    sync::Arc,
};

use log::{debug, info};

mod dispatch;

pub use dispatch::{Callback, Dispatch, Dispatcher};

use crate::{
    error::{Error, Result},
    report::{Sky, Tpv, Version},
    runtime::Runtime,
};

/// Command enabling the JSON report stream. GPSD commands are a verb
/// followed by a JSON argument, not plain JSON.
pub const WATCH_ENABLE: &[u8] = br#"?WATCH={"enable": true, "json": true}"#;

/// Longest accepted report line, newline included. GPSD's own responses
/// stay far below this.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Session with a GPSD daemon.
///
/// Reports are newline delimited JSON objects. [Client::run] reads them one
/// line at a time and hands each one to the [Dispatcher].
pub struct Client {
    stream: Arc<TcpStream>,
    reader: BufReader<TcpStream>,
    dispatcher: Dispatcher,
    line: Vec<u8>,
}

/// Handle closing a [Client] session from another thread.
/// A [Client::run] blocked on a read then returns promptly.
#[derive(Debug, Clone)]
pub struct Closer {
    stream: Arc<TcpStream>,
}

impl Closer {
    /// Shuts the connection down. Idempotent.
    pub fn close(&self) {
        shutdown(&self.stream);
    }
}

fn shutdown(stream: &TcpStream) {
    match stream.shutdown(Shutdown::Both) {
        Ok(_) => {},
        Err(e) if e.kind() == ErrorKind::NotConnected => {},
        Err(e) => debug!("gpsd shutdown: {}", e),
    }
}

impl Client {
    /// Connects to the daemon at `address` (`host:port`). No retry.
    pub fn connect(address: &str) -> Result<Self> {
        Self::connect_with_runtime(address, Arc::new(Runtime::default()))
    }

    /// Connects to the daemon, latching session statistics into `runtime`.
    pub fn connect_with_runtime(address: &str, runtime: Arc<Runtime>) -> Result<Self> {
        let stream = TcpStream::connect(address).map_err(Error::Connection)?;
        let reader = BufReader::new(stream.try_clone().map_err(Error::Connection)?);

        info!("{} - connected to gpsd at {}", runtime.timestamp(), address);

        Ok(Self {
            reader,
            stream: Arc::new(stream),
            dispatcher: Dispatcher::new(runtime),
            line: Vec::with_capacity(4096),
        })
    }

    /// Asks the daemon to start streaming JSON reports.
    /// Must be sent once before [Client::run], no response is awaited.
    pub fn enable_streaming(&self) -> Result<()> {
        let mut stream = &*self.stream;
        stream.write_all(WATCH_ENABLE).map_err(Error::Write)?;
        stream.flush().map_err(Error::Write)?;
        debug!("{} - streaming requested", self.dispatcher.runtime().timestamp());
        Ok(())
    }

    pub fn on_version<F: FnMut(Version) + Send + 'static>(&mut self, callback: F) {
        self.dispatcher.on_version(callback);
    }

    pub fn on_sky<F: FnMut(Sky) + Send + 'static>(&mut self, callback: F) {
        self.dispatcher.on_sky(callback);
    }

    pub fn on_tpv<F: FnMut(Tpv) + Send + 'static>(&mut self, callback: F) {
        self.dispatcher.on_tpv(callback);
    }

    pub fn on_unknown<F: FnMut(String) + Send + 'static>(&mut self, callback: F) {
        self.dispatcher.on_unknown(callback);
    }

    /// Session statistics
    pub fn runtime(&self) -> Arc<Runtime> {
        self.dispatcher.runtime()
    }

    pub fn closer(&self) -> Closer {
        Closer {
            stream: Arc::clone(&self.stream),
        }
    }

    /// Reads and dispatches the next line.
    ///
    /// ## Returns
    /// - Err(Error::Read) on I/O error, end of stream or a line longer
    ///   than [MAX_LINE_LEN]
    /// - Err(Error::Decode) if the line is not a report envelope
    pub fn process_next(&mut self) -> Result<Dispatch> {
        self.line.clear();

        let limit = MAX_LINE_LEN as u64;

        let size = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.line)
            .map_err(Error::Read)?;

        if size == 0 {
            return Err(Error::Read(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed",
            )));
        }

        if size as u64 == limit && self.line.last() != Some(&b'\n') {
            return Err(Error::Read(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("report line exceeds {} bytes", MAX_LINE_LEN),
            )));
        }

        self.dispatcher.dispatch(&self.line)
    }

    /// Processes reports until the session fails, then returns the
    /// first fatal error. Blocks the calling thread.
    pub fn run(&mut self) -> Error {
        loop {
            if let Err(e) = self.process_next() {
                return e;
            }
        }
    }

    /// Releases the connection. Idempotent.
    pub fn close(&self) {
        shutdown(&self.stream);
    }
}
