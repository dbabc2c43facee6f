//! The Python program actually executed for a testcase.
//!
//! The submission is embedded as a string literal and `exec`'d into its own namespace
//! at top level, so a syntax error in it kills the interpreter with a traceback on
//! stderr. Everything after that (dispatch, invocation, printing) runs inside
//! `try`, and an exception there becomes an `Error: <message>` line on stdout.

use std::collections::HashMap;

use crate::literal::{python_str_literal, Value};
use crate::model::{EntryKind, EntryPoint};
use crate::str_interp::{self, interp};

pub const NO_ENTRY_POINT_MESSAGE: &str =
    "No recognized function found. Please implement the required function.";

const TEMPLATE: &str = r#"import sys
import json

__pjudge_source__ = #{source}
__pjudge_ns__ = {"__name__": "__main__", "__builtins__": __builtins__}
exec(compile(__pjudge_source__, "<submission>", "exec"), __pjudge_ns__)

try:
    __pjudge_name__ = #{function}
    __pjudge_args__ = #{args}
    __pjudge_entry__ = __pjudge_ns__.get(__pjudge_name__)
    if not callable(__pjudge_entry__):
        __pjudge_result__ = #{no_entry_point}
    else:
#{dispatch}
    print(json.dumps(__pjudge_result__) if isinstance(__pjudge_result__, (list, dict)) else str(__pjudge_result__))
except Exception as e:
    print(f"Error: {str(e)}")
"#;

const DISPATCH_PAIR: &str = r#"        if isinstance(__pjudge_args__, list) and len(__pjudge_args__) >= 2:
            __pjudge_result__ = __pjudge_entry__(__pjudge_args__[0], __pjudge_args__[1])
        else:
            __pjudge_result__ = "Error: " + __pjudge_name__ + " requires array and target"
"#;

const DISPATCH_TEXT: &str = "        __pjudge_result__ = __pjudge_entry__(str(__pjudge_args__))\n";

const DISPATCH_INTEGER: &str = "        __pjudge_result__ = __pjudge_entry__(int(__pjudge_args__))\n";

fn dispatch_snippet(kind: EntryKind) -> &'static str {
    use EntryKind::*;
    match kind {
        Pair => DISPATCH_PAIR,
        Text => DISPATCH_TEXT,
        Integer => DISPATCH_INTEGER,
    }
}

/// Generate the driver source for one invocation.
pub fn render(code: &str, args: &Value, entry: &EntryPoint) -> str_interp::Result {
    let vars: HashMap<&str, String> = HashMap::from([
        ("source", python_str_literal(code)),
        ("function", python_str_literal(&entry.function)),
        ("args", args.to_python()),
        ("no_entry_point", python_str_literal(NO_ENTRY_POINT_MESSAGE)),
        ("dispatch", dispatch_snippet(entry.kind).to_owned()),
    ]);
    interp(TEMPLATE, &vars)
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::literal::normalize;

    #[test]
    fn every_kind_renders() {
        for kind in EntryKind::iter() {
            let src = render("def f(x): return x", &normalize("1"), &EntryPoint::new("f", kind));
            assert!(src.is_ok(), "{}: {:?}", kind, src);
        }
    }

    #[test]
    fn injection_points_are_literals() {
        let code = "s = '''#{args}'''\nprint(\"\"\"\\n\"\"\")\n";
        let src = render(
            code,
            &normalize("[2, 7, 11, 15]\n9"),
            &EntryPoint::new("two_sum", EntryKind::Pair),
        )
        .unwrap();

        assert!(src.contains(&format!("__pjudge_source__ = {}\n", python_str_literal(code))));
        assert!(src.contains("__pjudge_args__ = [[2, 7, 11, 15], 9]\n"));
        assert!(src.contains("__pjudge_name__ = \"two_sum\"\n"));
        assert!(src.contains(DISPATCH_PAIR));
        // the submission never appears raw in the driver
        assert!(!src.contains(code));
    }

    #[test]
    fn dispatch_matches_kind() {
        let src = render("", &normalize("7"), &EntryPoint::new("fibonacci", EntryKind::Integer))
            .unwrap();
        assert!(src.contains("__pjudge_entry__(int(__pjudge_args__))"));
        assert!(!src.contains("__pjudge_entry__(str(__pjudge_args__))"));

        let src = render("", &normalize("Madam"), &EntryPoint::new("is_palindrome", EntryKind::Text))
            .unwrap();
        assert!(src.contains("__pjudge_entry__(str(__pjudge_args__))"));
        assert!(src.contains("__pjudge_args__ = \"Madam\"\n"));
    }
}
