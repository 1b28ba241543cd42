//! Forwarding bodies for spied methods.
//!
//! The body records the call before anything can fail, then consults the
//! throwable error, then answers with the behavior closure or the stored
//! return value:
//!
//! ```swift
//! fetchIdCallsCount += 1
//! fetchIdReceivedId = id
//! fetchIdReceivedInvocations.append(id)
//! if let error = fetchIdThrowableError { throw error }
//! if fetchIdClosure != nil {
//!     return try await fetchIdClosure!(id)
//! } else {
//!     return fetchIdReturnValue
//! }
//! ```

use spysmith_syntax::{MethodMember, Parameter};

use crate::ir::{Condition, SwiftNode};
use crate::tracking::TrackingFieldSet;

/// Argument expression passed to the behavior closure.
fn closure_argument(param: &Parameter) -> SwiftNode {
    let name = SwiftNode::id(param.internal_name());
    if param.is_inout {
        name.in_out()
    } else if param.is_autoclosure {
        SwiftNode::call(name, Vec::new())
    } else {
        name
    }
}

/// `[try] [await] callee(args)`
fn closure_call(method: &MethodMember, callee: SwiftNode) -> SwiftNode {
    let arguments = method.parameters.iter().map(closure_argument).collect();
    SwiftNode::call(callee, arguments)
        .await_if(method.is_async())
        .try_if(method.is_throwing())
}

fn cast_if_needed(expr: SwiftNode, fields: &TrackingFieldSet) -> SwiftNode {
    match &fields.cast_target {
        Some(target) => expr.forced_cast(target.clone()),
        None => expr,
    }
}

/// Build the body of the spy method for `method`.
#[must_use]
pub fn body_for(method: &MethodMember, fields: &TrackingFieldSet) -> Vec<SwiftNode> {
    let mut body = Vec::with_capacity(5);

    // 1. count
    body.push(SwiftNode::binary(
        SwiftNode::id(&fields.calls_count),
        "+=",
        SwiftNode::int(1),
    ));

    // 2. record
    if let Some(recording) = &fields.recording {
        let value = || match recording.arguments.as_slice() {
            [single] => SwiftNode::id(single),
            many => SwiftNode::Tuple(many.iter().map(SwiftNode::id).collect()),
        };
        body.push(SwiftNode::assign(
            SwiftNode::id(&recording.received.name),
            value(),
        ));
        body.push(SwiftNode::call(
            SwiftNode::member(SwiftNode::id(&recording.invocations.name), "append"),
            vec![value()],
        ));
    }

    // 3. throw
    if let Some(error) = &fields.throwable_error {
        body.push(SwiftNode::if_stmt(
            Condition::OptionalBinding {
                name: "error".to_string(),
                value: SwiftNode::id(&error.name),
            },
            vec![SwiftNode::throw(SwiftNode::id("error"))],
            None,
        ));
    }

    // 4. answer
    let closure = SwiftNode::id(&fields.closure.name);
    match &fields.return_value {
        None => body.push(closure_call(method, closure.optional_chain())),
        Some(return_value) => body.push(SwiftNode::if_stmt(
            Condition::Expression(SwiftNode::binary(
                closure.clone(),
                "!=",
                SwiftNode::NilLiteral,
            )),
            vec![SwiftNode::ret(Some(cast_if_needed(
                closure_call(method, closure.force_unwrap()),
                fields,
            )))],
            Some(vec![SwiftNode::ret(Some(cast_if_needed(
                SwiftNode::id(&return_value.name),
                fields,
            )))]),
        )),
    }

    body
}

#[cfg(test)]
#[path = "../tests/forwarding_tests.rs"]
mod tests;
