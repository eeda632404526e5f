//! Prelude generation.
//!
//! Emitted programs refer to library functions only by hashed identifier.
//! The prelude is the module header that binds each of those identifiers
//! to the matching entry of the runtime's global environment, so it has to
//! be placed in front of the program before the script runs.

use conscript::Namespace;

/// Runtime module imported when none is given.
pub const DEFAULT_RUNTIME: &str = "./runtime/makeGlobals.js";

/// Bindings for every name in `ns` and its ancestors.
///
/// Child bindings shadow parent ones, matching how the emitter resolves.
pub fn generate(ns: &Namespace, runtime: &str) -> String {
    let mut code = format!(
        "import {{ makeGlobal }} from \"{}\";\nconst globalEnv = makeGlobal();\n",
        runtime.replace('\\', "\\\\").replace('"', "\\\"")
    );

    let mut seen = Vec::new();
    let mut scope = Some(ns.clone());
    while let Some(current) = scope {
        for (name, identifier) in current.bindings() {
            if seen.contains(&name) {
                continue;
            }
            code.push_str(&format!(
                "const {identifier} = globalEnv.get(\"{identifier}\");\n"
            ));
            seen.push(name);
        }
        scope = current.parent();
    }

    code
}
