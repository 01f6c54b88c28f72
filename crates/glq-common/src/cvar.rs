// cvar.rs -- console variables

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::cmd::CmdContext;
use crate::common::com_printf;
use crate::q_shared::q_atof;

/// A console variable.
#[derive(Debug, Clone)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
}

/// The cvar system context.
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    cvar_index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self {
            cvar_vars: Vec::new(),
            cvar_index: HashMap::new(),
        }
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Get the floating-point value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> usize {
        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return idx;
        }

        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            flags,
            modified: true,
            value: q_atof(value),
        });
        self.cvar_index.insert(name.to_string(), idx);
        idx
    }

    /// Set a cvar, creating it if needed.
    pub fn set(&mut self, name: &str, value: &str) -> usize {
        let idx = match self.cvar_index.get(name) {
            Some(&idx) => idx,
            None => return self.get(name, value, 0),
        };

        let var = &mut self.cvar_vars[idx];
        if value == var.string {
            return idx;
        }

        var.modified = true;
        var.string = value.to_string();
        var.value = q_atof(value);
        idx
    }

    /// Set a cvar from a float value.
    pub fn set_value(&mut self, name: &str, value: f32) {
        let val_str = if value == (value as i32) as f32 {
            format!("{}", value as i32)
        } else {
            format!("{}", value)
        };
        self.set(name, &val_str);
    }

    /// Handle variable inspection/changing from the console.
    /// Returns true if the command was a cvar reference.
    pub fn command(&mut self, argv0: &str, argc: usize, argv1: Option<&str>) -> bool {
        let idx = match self.cvar_index.get(argv0) {
            Some(&idx) => idx,
            None => return false,
        };

        if argc == 1 {
            com_printf(&format!(
                "\"{}\" is \"{}\"\n",
                self.cvar_vars[idx].name, self.cvar_vars[idx].string
            ));
            return true;
        }

        if let Some(value) = argv1 {
            let name = self.cvar_vars[idx].name.clone();
            self.set(&name, value);
        }
        true
    }
}

impl Default for CvarContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = Mutex::new(None);

pub fn cvar_init() {
    *CVAR_CTX.lock() = Some(CvarContext::new());
}

pub fn cvar_shutdown() {
    *CVAR_CTX.lock() = None;
}

pub fn cvar_get(name: &str, value: &str, flags: i32) -> Option<usize> {
    CVAR_CTX.lock().as_mut().map(|c| c.get(name, value, flags))
}

pub fn cvar_set(name: &str, value: &str) {
    if let Some(ref mut c) = *CVAR_CTX.lock() {
        c.set(name, value);
    }
}

pub fn cvar_set_value(name: &str, value: f32) {
    if let Some(ref mut c) = *CVAR_CTX.lock() {
        c.set_value(name, value);
    }
}

pub fn cvar_variable_value(name: &str) -> f32 {
    CVAR_CTX.lock().as_ref().map_or(0.0, |c| c.variable_value(name))
}

/// Access the global CVAR_CTX with a closure. Returns None if not initialized.
pub fn with_cvar_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CvarContext) -> R,
{
    CVAR_CTX.lock().as_mut().map(f)
}

/// Let the command system fall back to cvar lookup for unknown words, and
/// register the "set" command.
pub fn cvar_register_commands(cmd: &mut CmdContext) {
    cmd.cvar_command = Some(Box::new(|ctx: &mut CmdContext| {
        let argv0 = ctx.cmd_argv(0).to_string();
        let argc = ctx.cmd_argc();
        let argv1 = (argc > 1).then(|| ctx.cmd_argv(1).to_string());
        with_cvar_ctx(|c| c.command(&argv0, argc, argv1.as_deref())).unwrap_or(false)
    }));

    cmd.cmd_add_command("set", Some(Box::new(|ctx: &mut CmdContext| {
        if ctx.cmd_argc() != 3 {
            com_printf("usage: set <variable> <value>\n");
            return;
        }
        let (name, value) = (ctx.cmd_argv(1).to_string(), ctx.cmd_argv(2).to_string());
        cvar_set(&name, &value);
    })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_shared::CVAR_ARCHIVE;

    fn string_of<'a>(ctx: &'a CvarContext, name: &str) -> Option<&'a str> {
        ctx.find_var(name).map(|v| v.string.as_str())
    }

    #[test]
    fn test_cvar_get_and_find() {
        let mut ctx = CvarContext::new();
        ctx.get("_windowed_mouse", "1", CVAR_ARCHIVE);
        assert_eq!(ctx.variable_value("_windowed_mouse"), 1.0);
        assert_eq!(string_of(&ctx, "_windowed_mouse"), Some("1"));
    }

    #[test]
    fn test_cvar_get_creates_once() {
        let mut ctx = CvarContext::new();
        ctx.get("vid_mode", "0", 0);
        ctx.get("vid_mode", "3", CVAR_ARCHIVE);
        assert_eq!(string_of(&ctx, "vid_mode"), Some("0"));
        assert_eq!(ctx.find_var("vid_mode").map(|v| v.flags), Some(CVAR_ARCHIVE));
    }

    #[test]
    fn test_cvar_set_creates_and_marks_modified() {
        let mut ctx = CvarContext::new();
        ctx.set("gl_ztrick", "1");
        assert_eq!(ctx.variable_value("gl_ztrick"), 1.0);

        let idx = ctx.get("gl_ztrick", "0", 0);
        ctx.cvar_vars[idx].modified = false;
        ctx.set("gl_ztrick", "1");
        assert!(!ctx.cvar_vars[idx].modified);
        ctx.set("gl_ztrick", "0");
        assert!(ctx.cvar_vars[idx].modified);
    }

    #[test]
    fn test_cvar_set_value_formats_integers() {
        let mut ctx = CvarContext::new();
        ctx.get("bgmvolume", "1", CVAR_ARCHIVE);
        ctx.set_value("bgmvolume", 0.0);
        assert_eq!(string_of(&ctx, "bgmvolume"), Some("0"));
        ctx.set_value("bgmvolume", 0.5);
        assert_eq!(string_of(&ctx, "bgmvolume"), Some("0.5"));
    }

    #[test]
    fn test_cvar_not_found() {
        let ctx = CvarContext::new();
        assert_eq!(ctx.variable_value("nonexistent"), 0.0);
        assert!(ctx.find_var("nonexistent").is_none());
    }

    #[test]
    fn test_cvar_command_inspects_and_sets() {
        let mut ctx = CvarContext::new();
        ctx.get("vid_wait", "0", 0);
        assert!(!ctx.command("vid_waits", 2, Some("1")));
        assert!(ctx.command("vid_wait", 2, Some("1")));
        assert_eq!(ctx.variable_value("vid_wait"), 1.0);
    }
}
