//! Named method dispatch for host runtimes.
//!
//! A host runtime calls into the bridge by method name with positional
//! arguments and receives a JSON payload or a `{ code, message }` rejection.
//! The method table below is the stable contract: names, parameter names and
//! parameter order must not change without a version bump on the host side.

use crate::bridge::MediaEditBridge;
use crate::bridge::pending::{PendingOperation, Settlement, channel};
use crate::error::{ErrorKind, Rejection};
use crate::framework::MediaFramework;
use serde::Serialize;
use serde_json::Value;

/// Entry in the host method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub params: &'static [&'static str],
}

pub const SEPARATE_AUDIO_VIDEO: MethodSpec = MethodSpec {
    name: "separateAudioVideo",
    params: &["videoPath"],
};

pub const MERGE_AUDIO_WITH_VIDEO: MethodSpec = MethodSpec {
    name: "mergeAudioWithVideo",
    params: &["videoPath", "audioPath"],
};

pub const CONVERT_MP3_TO_M4A: MethodSpec = MethodSpec {
    name: "convertMp3ToM4a",
    params: &["mp3Path"],
};

pub const CANCEL_PROCESSING: MethodSpec = MethodSpec {
    name: "cancelProcessing",
    params: &[],
};

/// Every method exposed to hosts.
pub const METHOD_TABLE: &[MethodSpec] = &[
    SEPARATE_AUDIO_VIDEO,
    MERGE_AUDIO_WITH_VIDEO,
    CONVERT_MP3_TO_M4A,
    CANCEL_PROCESSING,
];

/// Looks up a method by its exposed name.
pub fn find_method(name: &str) -> Option<&'static MethodSpec> {
    METHOD_TABLE.iter().find(|spec| spec.name == name)
}

fn invalid(message: impl Into<String>) -> Rejection {
    Rejection::new(ErrorKind::InvalidInput, message)
}

/// Checks arity and types, returning the string arguments in order.
fn string_args<'a>(spec: &MethodSpec, args: &'a [Value]) -> Result<Vec<&'a str>, Rejection> {
    if args.len() != spec.params.len() {
        return Err(invalid(format!(
            "{} expects {} argument(s) ({}), got {}",
            spec.name,
            spec.params.len(),
            spec.params.join(", "),
            args.len()
        )));
    }
    spec.params
        .iter()
        .zip(args)
        .map(|(param, value)| {
            value
                .as_str()
                .ok_or_else(|| invalid(format!("{}: '{param}' must be a string", spec.name)))
        })
        .collect()
}

fn to_json<T: Serialize>(value: T) -> Settlement<Value> {
    serde_json::to_value(value).map_err(|e| {
        Rejection::new(ErrorKind::Unknown, format!("failed to serialize payload: {e}"))
    })
}

impl<F: MediaFramework> MediaEditBridge<F> {
    /// Invokes a method from [`METHOD_TABLE`] by name.
    ///
    /// Unknown names and malformed arguments reject with `INVALID_INPUT`
    /// without dispatching any work.
    pub fn invoke(&self, method: &str, args: &[Value]) -> PendingOperation<Value> {
        let Some(spec) = find_method(method) else {
            return PendingOperation::settled(Err(invalid(format!("unknown method '{method}'"))));
        };
        let args = match string_args(spec, args) {
            Ok(args) => args,
            Err(rejection) => return PendingOperation::settled(Err(rejection)),
        };
        log::debug!("Host invoked {}({:?})", spec.name, args);

        match spec.name {
            "separateAudioVideo" => self.forward(self.separate_audio_video(args[0])),
            "mergeAudioWithVideo" => self.forward(self.merge_audio_with_video(args[0], args[1])),
            "convertMp3ToM4a" => self.forward(self.convert_mp3_to_m4a(args[0])),
            "cancelProcessing" => {
                self.cancel_processing();
                PendingOperation::settled(Ok(Value::Null))
            }
            other => PendingOperation::settled(Err(Rejection::new(
                ErrorKind::Unknown,
                format!("method '{other}' has no handler"),
            ))),
        }
    }

    fn forward<T>(&self, operation: PendingOperation<T>) -> PendingOperation<Value>
    where
        T: Serialize + Send + 'static,
    {
        let (resolver, pending) = channel();
        self.runtime().spawn(async move {
            resolver.settle(operation.await.and_then(to_json));
        });
        pending
    }
}
