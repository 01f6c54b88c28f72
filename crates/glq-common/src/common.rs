// common.rs -- console printing, fatal errors and command-line parameters

use parking_lot::Mutex;

use crate::q_shared::{q_atof, q_atoi, ERR_DROP, ERR_FATAL};

pub const MAX_NUM_ARGVS: usize = 50;

/// Distribution name, used for the window title.
pub const DISTNAME: &str = "GLQuake";

// ============================================================
// Redirect buffer for Com_Printf
// ============================================================

static RD_BUFFER: Mutex<Option<String>> = Mutex::new(None);

/// Begin redirecting printf output into a buffer.
pub fn com_begin_redirect() {
    *RD_BUFFER.lock() = Some(String::new());
}

/// End redirect and return the captured output.
pub fn com_end_redirect() -> Option<String> {
    RD_BUFFER.lock().take()
}

// ============================================================
// Com_Printf / Com_DPrintf / Com_Error / Sys_Error
// ============================================================

/// General-purpose print function. Prints to stdout and appends to redirect
/// buffer if one is active.
pub fn com_printf(msg: &str) {
    {
        let mut buf = RD_BUFFER.lock();
        if let Some(ref mut s) = *buf {
            s.push_str(msg);
            return;
        }
    }
    print!("{}", msg);
}

/// Developer-only print, shown on the console when the "developer" cvar is set.
pub fn com_dprintf(msg: &str) {
    log::debug!("{}", msg.trim_end());
    if crate::cvar::cvar_variable_value("developer") == 0.0 {
        return;
    }
    com_printf(msg);
}

/// Engine error handler.
/// - `ERR_FATAL`: logs and panics.
/// - `ERR_DROP`: prints the error and carries on.
/// - `ERR_QUIT`: clean exit.
pub fn com_error(code: i32, msg: &str) {
    if code == ERR_FATAL {
        log::error!("{}", msg);
        panic!("Fatal error: {}", msg);
    } else if code == ERR_DROP {
        eprintln!("********************\nERROR: {}\n********************", msg);
    } else {
        println!("{}", msg);
        std::process::exit(0);
    }
}

/// Sys_Error -- unrecoverable platform failure. Reports and exits with status 1.
pub fn sys_error(msg: &str) -> ! {
    log::error!("{}", msg);
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

// ============================================================
// COM argument handling
// ============================================================

#[derive(Debug, Clone, Default)]
pub struct ComArgs {
    pub argv: Vec<String>,
}

impl ComArgs {
    pub fn new() -> Self {
        Self { argv: Vec::new() }
    }

    /// Convenience for tests and tools: build from string slices.
    pub fn from_strs(args: &[&str]) -> Self {
        let mut a = Self::new();
        a.init(&args.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        a
    }

    pub fn init(&mut self, args: &[String]) {
        let argc = args.len().min(MAX_NUM_ARGVS);
        self.argv = args[..argc].to_vec();
    }

    pub fn com_argc(&self) -> usize {
        self.argv.len()
    }

    pub fn com_argv(&self, arg: usize) -> &str {
        self.argv.get(arg).map_or("", |s| s.as_str())
    }

    /// COM_CheckParm -- index of the parameter, or None if it is absent.
    /// argv[0] is the program name and never matches.
    pub fn check_parm(&self, parm: &str) -> Option<usize> {
        (1..self.argv.len()).find(|&i| self.argv[i] == parm)
    }

    /// The argument following `parm`, e.g. `-width 800` -> "800".
    pub fn parm_value(&self, parm: &str) -> Option<&str> {
        self.check_parm(parm).map(|i| self.com_argv(i + 1))
    }

    pub fn parm_int(&self, parm: &str) -> Option<i32> {
        self.parm_value(parm).map(q_atoi)
    }

    pub fn parm_float(&self, parm: &str) -> Option<f32> {
        self.parm_value(parm).map(q_atof)
    }
}

static COM_ARGS: Mutex<Option<ComArgs>> = Mutex::new(None);

/// Record the process command line.
pub fn com_init_args(args: &[String]) {
    let mut a = ComArgs::new();
    a.init(args);
    *COM_ARGS.lock() = Some(a);
}

/// Snapshot of the command line, empty before `com_init_args`.
pub fn com_args() -> ComArgs {
    COM_ARGS.lock().clone().unwrap_or_default()
}

pub fn com_check_parm(parm: &str) -> Option<usize> {
    COM_ARGS.lock().as_ref().and_then(|a| a.check_parm(parm))
}

pub fn com_parm_value(parm: &str) -> Option<String> {
    COM_ARGS.lock().as_ref().and_then(|a| a.parm_value(parm).map(str::to_string))
}

pub fn com_parm_int(parm: &str) -> Option<i32> {
    COM_ARGS.lock().as_ref().and_then(|a| a.parm_int(parm))
}

pub fn com_parm_float(parm: &str) -> Option<f32> {
    COM_ARGS.lock().as_ref().and_then(|a| a.parm_float(parm))
}
