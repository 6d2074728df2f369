use crate::utils::{Error, Result};
use serde_json::{json, Value};

/// Vim channel messages, one JSON value per line.
///
/// Incoming: `[id, {"method", "params"}]` requests with positive ids,
/// `[{"method", "params"}]` notifications, and `[id, result]` responses to our
/// calls, which always carry negative ids. Outgoing calls use the channel
/// command form `["call", func, args(, id)]`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    Request {
        id: u64,
        method: String,
        params: Value,
    },
    Response {
        id: i64,
        result: Value,
    },
    Notification {
        method: String,
        params: Value,
    },
    /// Call a Vim function and wait for `[id, result]`
    Call {
        func: String,
        args: Vec<Value>,
        id: i64,
    },
    /// Call a Vim function without a reply
    CallAsync {
        func: String,
        args: Vec<Value>,
    },
}

impl ChannelMessage {
    pub fn parse(line: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(line)?;
        Self::from_value(&json)
    }

    pub fn from_value(json: &Value) -> Result<Self> {
        let arr = json
            .as_array()
            .ok_or_else(|| Error::protocol("message is not an array"))?;

        match arr.as_slice() {
            [Value::Object(obj)] => Ok(ChannelMessage::Notification {
                method: method_of(obj)?,
                params: obj.get("params").cloned().unwrap_or(Value::Null),
            }),
            [Value::Number(n), body] => match n.as_i64() {
                Some(id) if id > 0 => {
                    let obj = body
                        .as_object()
                        .ok_or_else(|| Error::protocol("request body is not an object"))?;
                    Ok(ChannelMessage::Request {
                        id: id as u64,
                        method: method_of(obj)?,
                        params: obj.get("params").cloned().unwrap_or(Value::Null),
                    })
                }
                Some(id) if id < 0 => Ok(ChannelMessage::Response {
                    id,
                    result: body.clone(),
                }),
                _ => Err(Error::protocol(format!("invalid message id: {}", n))),
            },
            _ => Err(Error::protocol(format!("unrecognized message: {}", json))),
        }
    }

    pub fn encode(&self) -> Value {
        match self {
            ChannelMessage::Request { id, method, params } => {
                json!([*id, {"method": method, "params": params}])
            }
            ChannelMessage::Response { id, result } => json!([*id, result]),
            ChannelMessage::Notification { method, params } => {
                json!([{"method": method, "params": params}])
            }
            ChannelMessage::Call { func, args, id } => json!(["call", func, args, id]),
            ChannelMessage::CallAsync { func, args } => json!(["call", func, args]),
        }
    }
}

fn method_of(obj: &serde_json::Map<String, Value>) -> Result<String> {
    obj.get("method")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::protocol("missing method"))
}
