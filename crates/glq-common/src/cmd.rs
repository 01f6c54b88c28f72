// cmd.rs -- console command buffer, tokenizer and command registry

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::common::com_printf;
use crate::q_shared::{MAX_STRING_CHARS, MAX_STRING_TOKENS};

const CMD_TEXT_SIZE: usize = 8192;

/// A console command callback. Receives the context so it can read its
/// tokenized arguments without going back through the global.
pub type CmdFn = Box<dyn Fn(&mut CmdContext) + Send>;

/// Callback for words that are not commands (cvar inspection/assignment).
/// Returns true if handled.
pub type CvarCommandFn = Box<dyn Fn(&mut CmdContext) -> bool + Send>;

/// A registered command.
pub struct CmdFunction {
    pub name: String,
    pub function: Option<CmdFn>,
}

/// The command system context.
pub struct CmdContext {
    // Command buffer
    pub cmd_text: String,
    pub cmd_wait: bool,

    // Tokenized command line
    pub cmd_argv: Vec<String>,
    pub cmd_args: String,

    // Registered commands, looked up by lowercase name
    pub cmd_functions: Vec<CmdFunction>,
    cmd_functions_index: HashMap<String, usize>,

    pub cvar_command: Option<CvarCommandFn>,
}

impl CmdContext {
    pub fn new() -> Self {
        Self {
            cmd_text: String::new(),
            cmd_wait: false,
            cmd_argv: Vec::new(),
            cmd_args: String::new(),
            cmd_functions: Vec::new(),
            cmd_functions_index: HashMap::new(),
            cvar_command: None,
        }
    }

    // ========================================================
    // Command buffer operations (Cbuf_*)
    // ========================================================

    /// Add command text at the end of the buffer.
    pub fn cbuf_add_text(&mut self, text: &str) {
        if self.cmd_text.len() + text.len() >= CMD_TEXT_SIZE {
            com_printf("Cbuf_AddText: overflow\n");
            return;
        }
        self.cmd_text.push_str(text);
    }

    /// Execute all commands in the buffer. Lines end at `\n` or at a `;`
    /// outside quotes.
    pub fn cbuf_execute(&mut self) {
        while !self.cmd_text.is_empty() {
            let bytes = self.cmd_text.as_bytes();
            let mut quotes = 0;
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'"' {
                    quotes += 1;
                }
                if (quotes & 1) == 0 && bytes[i] == b';' {
                    break;
                }
                if bytes[i] == b'\n' {
                    break;
                }
                i += 1;
            }

            let line = self.cmd_text[..i].to_string();
            if i >= self.cmd_text.len() {
                self.cmd_text.clear();
            } else {
                self.cmd_text.drain(..=i);
            }

            self.cmd_execute_string(&line);

            if self.cmd_wait {
                // leave the rest for next frame
                self.cmd_wait = false;
                break;
            }
        }
    }

    // ========================================================
    // Command tokenization
    // ========================================================

    /// Parse the given string into command line tokens.
    pub fn cmd_tokenize_string(&mut self, text: &str) {
        self.cmd_argv.clear();
        self.cmd_args.clear();

        if text.len() >= MAX_STRING_CHARS {
            com_printf(&format!("Line exceeded {} chars, discarded.\n", MAX_STRING_CHARS));
            return;
        }

        let bytes = text.as_bytes();
        let mut pos = 0;

        loop {
            // Skip whitespace up to a \n
            while pos < bytes.len() && bytes[pos] <= b' ' && bytes[pos] != b'\n' {
                pos += 1;
            }

            if pos >= bytes.len() || bytes[pos] == b'\n' {
                return;
            }

            // cmd_args is everything after the first arg
            if self.cmd_argv.len() == 1 {
                self.cmd_args = String::from_utf8_lossy(&bytes[pos..]).trim_end().to_string();
            }

            let (token, new_pos) = com_parse_inline(bytes, pos);
            if new_pos == pos {
                return;
            }
            pos = new_pos;

            if self.cmd_argv.len() < MAX_STRING_TOKENS {
                self.cmd_argv.push(token);
            }
        }
    }

    // ========================================================
    // Command registration
    // ========================================================

    /// Register a new command. Names are case-insensitive and may not be
    /// registered twice.
    pub fn cmd_add_command(&mut self, name: &str, function: Option<CmdFn>) {
        let key = name.to_ascii_lowercase();

        if self.cmd_functions_index.contains_key(&key) {
            com_printf(&format!("Cmd_AddCommand: {} already defined\n", name));
            return;
        }

        let idx = self.cmd_functions.len();
        self.cmd_functions.push(CmdFunction {
            name: name.to_string(),
            function,
        });
        self.cmd_functions_index.insert(key, idx);
    }

    pub fn cmd_argc(&self) -> usize {
        self.cmd_argv.len()
    }

    /// Get argument by index. Returns empty string if out of range.
    pub fn cmd_argv(&self, arg: usize) -> &str {
        self.cmd_argv.get(arg).map_or("", |s| s.as_str())
    }

    /// All arguments after the first as a single string.
    pub fn cmd_args(&self) -> &str {
        &self.cmd_args
    }

    // ========================================================
    // Command execution
    // ========================================================

    /// Execute a single command line.
    pub fn cmd_execute_string(&mut self, text: &str) {
        self.cmd_tokenize_string(text);

        if self.cmd_argv.is_empty() {
            return;
        }

        let key = self.cmd_argv[0].to_ascii_lowercase();

        if let Some(&idx) = self.cmd_functions_index.get(&key) {
            // Take the callback out so it can borrow the context mutably
            if let Some(f) = self.cmd_functions[idx].function.take() {
                f(self);
                // the command may have removed itself
                if let Some(&idx) = self.cmd_functions_index.get(&key) {
                    self.cmd_functions[idx].function = Some(f);
                }
            }
            return;
        }

        if let Some(cvar_cmd) = self.cvar_command.take() {
            let handled = cvar_cmd(self);
            self.cvar_command = Some(cvar_cmd);
            if handled {
                return;
            }
        }

        com_printf(&format!("Unknown command \"{}\"\n", self.cmd_argv(0)));
    }

    // ========================================================
    // Built-in command handlers
    // ========================================================

    /// Cmd_Wait_f -- delay the rest of the buffer until the next frame.
    pub fn cmd_wait_f(&mut self) {
        self.cmd_wait = true;
    }

    /// Cmd_Echo_f -- just prints the rest of the line to the console.
    pub fn cmd_echo_f(&self) {
        for i in 1..self.cmd_argc() {
            com_printf(&format!("{} ", self.cmd_argv(i)));
        }
        com_printf("\n");
    }

    /// Cmd_List_f -- lists all registered commands, optionally filtered by prefix.
    pub fn cmd_list_f(&self) {
        let prefix = self.cmd_argv(1).to_ascii_lowercase();
        let mut matching = 0;
        for cmd in &self.cmd_functions {
            if cmd.name.to_ascii_lowercase().starts_with(&prefix) {
                com_printf(&format!("{}\n", cmd.name));
                matching += 1;
            }
        }
        com_printf(&format!("{} commands, {} matching\n", self.cmd_functions.len(), matching));
    }

    /// Register built-in commands: cmdlist, echo, wait.
    pub fn cmd_init(&mut self) {
        self.cmd_add_command("cmdlist", Some(Box::new(|ctx: &mut CmdContext| ctx.cmd_list_f())));
        self.cmd_add_command("echo", Some(Box::new(|ctx: &mut CmdContext| ctx.cmd_echo_f())));
        self.cmd_add_command("wait", Some(Box::new(|ctx: &mut CmdContext| ctx.cmd_wait_f())));
    }
}

impl Default for CmdContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single token from the byte slice starting at `pos`.
/// Returns (token, new_pos).
fn com_parse_inline(data: &[u8], mut pos: usize) -> (String, usize) {
    let mut token = String::new();

    if data[pos] == b'"' {
        pos += 1;
        while pos < data.len() && data[pos] != b'"' && data[pos] != b'\n' {
            token.push(data[pos] as char);
            pos += 1;
        }
        if pos < data.len() && data[pos] == b'"' {
            pos += 1;
        }
        return (token, pos);
    }

    while pos < data.len() && data[pos] > b' ' {
        token.push(data[pos] as char);
        pos += 1;
    }

    (token, pos)
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CMD_CTX: Mutex<Option<CmdContext>> = Mutex::new(None);

pub fn cmd_init() {
    let mut ctx = CmdContext::new();
    ctx.cmd_init();
    *CMD_CTX.lock() = Some(ctx);
}

pub fn cmd_shutdown() {
    *CMD_CTX.lock() = None;
}

pub fn cmd_add_command(name: &str, function: Option<CmdFn>) {
    if let Some(ref mut c) = *CMD_CTX.lock() {
        c.cmd_add_command(name, function);
    }
}

pub fn cbuf_add_text(text: &str) {
    if let Some(ref mut c) = *CMD_CTX.lock() {
        c.cbuf_add_text(text);
    }
}

pub fn cbuf_execute() {
    if let Some(ref mut c) = *CMD_CTX.lock() {
        c.cbuf_execute();
    }
}

pub fn cmd_execute_string(text: &str) {
    if let Some(ref mut c) = *CMD_CTX.lock() {
        c.cmd_execute_string(text);
    }
}

/// Access the global CMD_CTX with a closure. Returns None if not initialized.
pub fn with_cmd_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CmdContext) -> R,
{
    CMD_CTX.lock().as_mut().map(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tokenize() {
        let mut ctx = CmdContext::new();
        ctx.cmd_tokenize_string("cd remap 3 \"4 5\"");
        assert_eq!(ctx.cmd_argc(), 4);
        assert_eq!(ctx.cmd_argv(0), "cd");
        assert_eq!(ctx.cmd_argv(3), "4 5");
        assert_eq!(ctx.cmd_args(), "remap 3 \"4 5\"");
        assert_eq!(ctx.cmd_argv(9), "");
    }

    #[test]
    fn test_cmd_add_rejects_duplicates() {
        let mut ctx = CmdContext::new();
        ctx.cmd_add_command("vid_nummodes", None);
        ctx.cmd_add_command("VID_NUMMODES", None);
        assert_eq!(ctx.cmd_functions.len(), 1);
        assert_eq!(ctx.cmd_functions[0].name, "vid_nummodes");
    }

    #[test]
    fn test_cmd_execute_callback_sees_args() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_clone = seen.clone();

        let mut ctx = CmdContext::new();
        ctx.cmd_add_command("cd", Some(Box::new(move |ctx: &mut CmdContext| {
            seen_clone.lock().extend(ctx.cmd_argv.iter().cloned());
        })));

        ctx.cmd_execute_string("CD play 2");
        assert_eq!(*seen.lock(), vec!["CD", "play", "2"]);
    }

    #[test]
    fn test_cbuf_splits_lines_and_semicolons() {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();

        let mut ctx = CmdContext::new();
        ctx.cmd_add_command("tick", Some(Box::new(move |_ctx: &mut CmdContext| {
            *count_clone.lock() += 1;
        })));

        ctx.cbuf_add_text("tick; tick\ntick \"a;b\"\n");
        ctx.cbuf_execute();
        assert_eq!(*count.lock(), 3);
        assert!(ctx.cmd_text.is_empty());
    }

    #[test]
    fn test_cmd_wait() {
        let mut ctx = CmdContext::new();
        ctx.cmd_init();
        ctx.cbuf_add_text("echo first\nwait\necho second\n");
        ctx.cbuf_execute();
        assert_eq!(ctx.cmd_text, "echo second\n");
    }

    #[test]
    fn test_cvar_fallback() {
        let mut ctx = CmdContext::new();
        ctx.cvar_command = Some(Box::new(|ctx: &mut CmdContext| ctx.cmd_argv(0) == "bgmvolume"));
        // handled by the cvar callback, so nothing else happens
        ctx.cmd_execute_string("bgmvolume 0");
        assert!(ctx.cvar_command.is_some());
    }
}
