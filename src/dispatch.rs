use rosc::OscMessage;

use crate::buffer::ReceiveBuffer;
use crate::capsule::Capsule;
use crate::error::{HandlerError, PortError};

/// Result type handler callbacks return. An `Err` is routed back onto the
/// error queue and never stops dispatch of the remaining queued items.
pub type HandlerResult = Result<(), HandlerError>;

pub type ReceiveHandler = Box<dyn FnMut(&Capsule) -> HandlerResult + Send>;
pub type PathHandler = Box<dyn FnMut(&OscMessage) -> HandlerResult + Send>;
pub type ErrorHandler = Box<dyn FnMut(&PortError) + Send>;

/// Registered consumers of inbound traffic.
///
/// Path handlers are an ordered list, not a map: dispatch tries them in
/// registration order and stops at the first exact path match, so multiple
/// registrations may share a path and only the earliest fires.
#[derive(Default)]
pub struct Handlers {
    pub(crate) on_receive: Option<ReceiveHandler>,
    pub(crate) on_error: Option<ErrorHandler>,
    pub(crate) on_path: Vec<(String, PathHandler)>,
}

/// One dispatch pass over both queues.
///
/// Capsules go to the general receive handler first, then to the first
/// matching path handler. Errors go to the general error handler, or to
/// stderr when none is registered. Handler failures are queued as
/// `PortError::Handler`; since the error drain runs after the message drain,
/// they reach the error handler in the same pass.
pub(crate) fn dispatch_tick(buffer: &ReceiveBuffer, handlers: &mut Handlers) {
    for capsule in buffer.drain_received() {
        if let Some(on_receive) = handlers.on_receive.as_mut() {
            if let Err(e) = on_receive(&capsule) {
                buffer.push_error(PortError::Handler(e));
            }
        }
        for (path, handler) in handlers.on_path.iter_mut() {
            if path == capsule.path() {
                if let Err(e) = handler(&capsule.message) {
                    buffer.push_error(PortError::Handler(e));
                }
                break;
            }
        }
    }
    for err in buffer.drain_errors() {
        match handlers.on_error.as_mut() {
            Some(on_error) => on_error(&err),
            None => eprintln!("oscport: unhandled receive error: {err}"),
        }
    }
}
