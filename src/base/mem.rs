use std::cell::RefCell;
use std::rc::Rc;

use crate::base::port::ResponsePort;
use crate::timeq::Cycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemRequestKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemResponse {
    pub addr: u64,
}

/// A request travelling from a core to the memory system.  Reads carry the port their response
/// is delivered through; writes are fire-and-forget and carry none.
#[derive(Debug, Clone)]
pub struct MemRequest {
    pub addr: u64,
    pub kind: MemRequestKind,
    response_port: Option<ResponsePort>,
}

impl MemRequest {
    pub fn read(addr: u64, port: ResponsePort) -> Self {
        Self {
            addr,
            kind: MemRequestKind::Read,
            response_port: Some(port),
        }
    }

    pub fn write(addr: u64) -> Self {
        Self {
            addr,
            kind: MemRequestKind::Write,
            response_port: None,
        }
    }

    pub fn is_write(&self) -> bool {
        self.kind == MemRequestKind::Write
    }

    pub fn expects_response(&self) -> bool {
        self.response_port.is_some()
    }

    /// Schedule the response to this request at `cycle`.  No-op for writes.
    pub fn respond(&self, cycle: Cycle) {
        if let Some(port) = &self.response_port {
            port.send(cycle, MemResponse { addr: self.addr });
        }
    }
}

/// Anything that accepts memory requests from a core.
pub trait MemRequestSink {
    fn submit(&mut self, request: MemRequest);
}

impl<S: MemRequestSink + ?Sized> MemRequestSink for Box<S> {
    fn submit(&mut self, request: MemRequest) {
        (**self).submit(request);
    }
}

// lets the driver keep ticking a controller that a core also submits into
impl<S: MemRequestSink + ?Sized> MemRequestSink for Rc<RefCell<S>> {
    fn submit(&mut self, request: MemRequest) {
        self.borrow_mut().submit(request);
    }
}
