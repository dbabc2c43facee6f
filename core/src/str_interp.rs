//! `#{name}` placeholder substitution used to build the driver program.
//!
//! Substituted values are copied verbatim and never rescanned, so a value that
//! itself contains `#{...}` is not expanded a second time. `##` is an escaped `#`.

use std::{borrow::Borrow, collections::HashMap, hash::Hash};

pub type Result = std::result::Result<String, InterpError>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpError {
    #[error("Undefined placeholder '{0}' at {}", .1+1)]
    UndefinedVar(String, usize),

    #[error("Unclosed brace (found open brace at {})", .0+1)]
    UnclosedBrace(usize),
}

pub fn interp<K, V>(template: &str, variables: &HashMap<K, V>) -> Result
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum State {
        Normal,
        HashMark,
        InsideBrace,
    }
    use State::*;

    let mut state = Normal;
    let mut pos_open_brace = 0;
    let extra: usize = variables.values().map(|v| v.as_ref().len()).sum();
    let mut res = String::with_capacity(template.len() + extra);
    let mut var_name = String::with_capacity(32);

    for (i, c) in template.chars().enumerate() {
        match (c, state) {
            ('#', Normal) => {
                state = HashMark;
                res.push(c);
            }
            ('#', HashMark) => {
                state = Normal;
            }
            ('{', HashMark) => {
                state = InsideBrace;
                pos_open_brace = i;
                var_name.clear();
                res.pop(); // remove '#'
            }
            ('}', InsideBrace) => {
                state = Normal;
                let Some(value) = variables.get(var_name.as_str()) else {
                    return Err(InterpError::UndefinedVar(var_name, pos_open_brace + 1))
                };
                res += value.as_ref();
            }
            (_, InsideBrace) => {
                var_name.push(c);
            }
            _ => {
                state = Normal;
                res.push(c);
            }
        }
    }

    if state == InsideBrace {
        Err(InterpError::UnclosedBrace(pos_open_brace))
    } else {
        res.shrink_to_fit();
        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interp_ok() {
        let vars = {
            let mut m = HashMap::new();
            m.insert("source", "def f(x):\n    return x\n");
            m.insert("args", "[1, 2]");
            m.insert("function", "'f'");
            m
        };

        assert_eq!(interp("print(1)", &vars).unwrap(), "print(1)");
        assert_eq!(interp("#{args}", &vars).unwrap(), "[1, 2]");
        assert_eq!(
            interp("f = ns.get(#{function})", &vars).unwrap(),
            "f = ns.get('f')"
        );
        assert_eq!(
            interp("#{source}x = #{args}", &vars).unwrap(),
            "def f(x):\n    return x\nx = [1, 2]"
        );
        assert_eq!(interp("d = {args}", &vars).unwrap(), "d = {args}");
        assert_eq!(interp("# comment {args}", &vars).unwrap(), "# comment {args}");
        assert_eq!(interp("x = 1  # note", &vars).unwrap(), "x = 1  # note");
        assert_eq!(interp("s = '##{args}'", &vars).unwrap(), "s = '#{args}'");
        assert_eq!(interp("#", &vars).unwrap(), "#");
        assert_eq!(interp("##", &vars).unwrap(), "#");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut vars = HashMap::new();
        vars.insert("source", "print('#{args}')");
        vars.insert("args", "SHOULD_NOT_APPEAR");
        assert_eq!(interp("#{source}", &vars).unwrap(), "print('#{args}')");
    }

    #[test]
    fn interp_ng() {
        let vars = {
            let mut m = HashMap::new();
            m.insert("args", "[]");
            m
        };
        assert_eq!(
            interp("#{source} #{args}", &vars).unwrap_err(),
            InterpError::UndefinedVar("source".to_owned(), 2)
        );
        assert_eq!(
            interp("#{args} #{source", &vars).unwrap_err(),
            InterpError::UnclosedBrace(9),
        );
    }
}
