//! Instrumentation synthesis - printf probes for fault sites
//!
//! Downstream tooling patches compiled programs by splicing a print
//! statement in front of the faulting line. This module renders that
//! statement from an analysis result: one `printf` echoing the location and
//! every visible variable. Types without a known format specifier stay in
//! the output as an explicit `??type??` placeholder rather than vanishing.

use crate::location::FaultLocation;
use crate::report::VariableBinding;

/// C format specifier for a type spelling, if the table knows it.
///
/// Pointers format as `%p` except `char *`, which prints as a string. A
/// leading `const` does not change how a value is formatted.
pub fn format_specifier(type_name: &str) -> Option<&'static str> {
    let name = type_name.trim();
    let name = name.strip_prefix("const ").unwrap_or(name).trim();

    if let Some(pointee) = name.strip_suffix('*') {
        let pointee = pointee.trim();
        let pointee = pointee.strip_prefix("const ").unwrap_or(pointee).trim();
        return Some(if pointee == "char" { "%s" } else { "%p" });
    }

    match name {
        "char" => Some("%c"),
        "short" | "int" | "_Bool" => Some("%d"),
        "long" => Some("%ld"),
        "long long" => Some("%lld"),
        "unsigned char" | "unsigned short" | "unsigned" | "unsigned int" => Some("%u"),
        "unsigned long" => Some("%lu"),
        "unsigned long long" => Some("%llu"),
        "float" | "double" => Some("%f"),
        _ => None,
    }
}

/// Specifier for known types, `??type??` for everything else.
pub fn specifier_or_placeholder(type_name: &str) -> String {
    match format_specifier(type_name) {
        Some(spec) => spec.to_string(),
        None => format!("??{type_name}??"),
    }
}

/// Render the probe statement for one fault location.
///
/// Variables with unknown types appear in the format string as placeholders
/// but are not passed as arguments, so the emitted statement stays valid C.
pub fn printf_probe(location: &FaultLocation, bindings: &[VariableBinding]) -> String {
    let mut format = escape_c(&location.to_string());
    format.push(':');
    let mut args = Vec::new();

    for binding in bindings {
        format.push(' ');
        format.push_str(&binding.name);
        format.push('=');
        match format_specifier(&binding.type_name) {
            Some(spec) => {
                format.push_str(spec);
                args.push(binding.name.as_str());
            }
            None => {
                format.push_str(&format!("??{}??", binding.type_name));
            }
        }
    }

    let mut probe = format!("printf(\"{format}\\n\"");
    for arg in args {
        probe.push_str(", ");
        probe.push_str(arg);
    }
    probe.push_str(");");
    probe
}

/// Escape text for inclusion in a C string literal used as a printf format.
fn escape_c(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '%' => escaped.push_str("%%"),
            _ => escaped.push(c),
        }
    }
    escaped
}
