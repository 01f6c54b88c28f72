// cd_audio.rs -- CD music playback and the "cd" console command

use parking_lot::Mutex;

use glq_common::cmd::{cmd_add_command, CmdContext};
use glq_common::common::{com_dprintf, com_printf, ComArgs};
use glq_common::cvar::{cvar_get, cvar_set_value, cvar_variable_value};
use glq_common::q_shared::{q_atoi, q_streq_nocase, CVAR_ARCHIVE};

pub const MAX_TRACKS: usize = 100;

/// What the drive reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdStatus {
    NoDisc,
    TrayOpen,
    Stopped,
    Playing,
    Paused,
    Error,
}

#[derive(Debug)]
pub enum CdError {
    /// CD audio is turned off (dedicated server or -nocdaudio).
    Disabled,
    /// No drive could be opened.
    NoDrive(String),
    /// The drive rejected a request.
    Io(std::io::Error),
    /// The backend cannot do this.
    Unsupported(&'static str),
}

impl std::fmt::Display for CdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CdError::Disabled => write!(f, "CD audio disabled"),
            CdError::NoDrive(msg) => write!(f, "no CD-ROM drive: {}", msg),
            CdError::Io(e) => write!(f, "CD-ROM error: {}", e),
            CdError::Unsupported(what) => write!(f, "{} not supported", what),
        }
    }
}

impl std::error::Error for CdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CdError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CdError {
    fn from(e: std::io::Error) -> Self {
        CdError::Io(e)
    }
}

/// A CD-ROM drive that can play audio tracks.
pub trait CdDrive: Send {
    fn status(&mut self) -> CdStatus;
    /// Number of the last track on the disc.
    fn track_count(&mut self) -> Result<u8, CdError>;
    fn is_audio_track(&mut self, track: u8) -> Result<bool, CdError>;
    fn play_track(&mut self, track: u8) -> Result<(), CdError>;
    fn stop(&mut self) -> Result<(), CdError>;
    fn pause(&mut self) -> Result<(), CdError>;
    fn resume(&mut self) -> Result<(), CdError>;
    fn eject(&mut self) -> Result<(), CdError>;
    fn close_tray(&mut self) -> Result<(), CdError>;
}

pub struct CdAudio {
    pub cd_valid: bool,
    pub playing: bool,
    pub was_playing: bool,
    pub initialized: bool,
    pub enabled: bool,
    pub play_looping: bool,
    pub cdvolume: f32,
    pub remap: [u8; MAX_TRACKS],
    pub play_track: u8,
    pub max_track: u8,
    drive: Option<Box<dyn CdDrive>>,
}

fn identity_remap() -> [u8; MAX_TRACKS] {
    std::array::from_fn(|n| n as u8)
}

impl CdAudio {
    /// CDAudio_Init
    pub fn init<F>(args: &ComArgs, dedicated: bool, open_drive: F) -> Result<Self, CdError>
    where
        F: FnOnce(&ComArgs) -> Result<Box<dyn CdDrive>, CdError>,
    {
        if dedicated || args.check_parm("-nocdaudio").is_some() {
            return Err(CdError::Disabled);
        }

        let drive = match open_drive(args) {
            Ok(drive) => drive,
            Err(e) => {
                com_printf("CDAudio_Init: no CD-ROM drives present\n");
                return Err(e);
            }
        };

        let mut cd = Self::with_drive(drive);
        if cd.get_audio_disk_info().is_err() {
            com_printf("CDAudio_Init: No CD in player.\n");
        }
        com_printf("CD Audio Initialized\n");
        Ok(cd)
    }

    fn with_drive(drive: Box<dyn CdDrive>) -> Self {
        Self {
            cd_valid: false,
            playing: false,
            was_playing: false,
            initialized: true,
            enabled: true,
            play_looping: false,
            cdvolume: 0.0,
            remap: identity_remap(),
            play_track: 0,
            max_track: 0,
            drive: Some(drive),
        }
    }

    /// CDAudio_GetAudioDiskInfo -- sets `cd_valid` when a disc with tracks is present.
    pub fn get_audio_disk_info(&mut self) -> Result<(), CdError> {
        self.cd_valid = false;
        let drive = self.drive.as_mut().ok_or(CdError::Unsupported("no drive"))?;

        match drive.status() {
            CdStatus::NoDisc | CdStatus::TrayOpen => {
                com_dprintf("CDAudio: No CD in drive\n");
                return Err(CdError::NoDrive("no disc".to_string()));
            }
            _ => {}
        }

        let tracks = drive.track_count().map_err(|e| {
            com_dprintf("CDAudio: drive not ready\n");
            e
        })?;
        if tracks < 1 {
            com_dprintf("CDAudio: no music tracks\n");
            return Err(CdError::NoDrive("no music tracks".to_string()));
        }

        self.cd_valid = true;
        self.max_track = tracks;
        Ok(())
    }

    /// CDAudio_Play -- `track` goes through the remap table.
    pub fn play(&mut self, track: u8, looping: bool) {
        if !self.enabled {
            return;
        }
        if !self.cd_valid {
            let _ = self.get_audio_disk_info();
            if !self.cd_valid {
                return;
            }
        }
        let track = self.remap.get(track as usize).copied().unwrap_or(track);
        self.play_remapped(track, looping);
    }

    fn play_remapped(&mut self, track: u8, looping: bool) {
        if track < 1 || track > self.max_track {
            com_dprintf(&format!("CDAudio: Bad track number {}.\n", track));
            return;
        }
        let Some(drive) = self.drive.as_mut() else {
            return;
        };

        // don't try to play a non-audio track
        match drive.is_audio_track(track) {
            Ok(true) => {}
            Ok(false) => {
                com_printf(&format!("CDAudio: track {} is not audio\n", track));
                return;
            }
            Err(e) => {
                com_dprintf(&format!("CDAudio: reading track {} failed: {}\n", track, e));
                return;
            }
        }

        if self.playing {
            if self.play_track == track {
                return;
            }
            self.stop();
        }

        let Some(drive) = self.drive.as_mut() else {
            return;
        };
        if let Err(e) = drive.play_track(track) {
            com_dprintf(&format!("CDAudio: play track {} failed: {}\n", track, e));
            return;
        }

        self.play_looping = looping;
        self.play_track = track;
        self.playing = true;

        if self.cdvolume == 0.0 {
            self.pause();
        }
    }

    /// CDAudio_Stop
    pub fn stop(&mut self) {
        if !self.enabled || !self.playing {
            return;
        }
        if let Some(Err(e)) = self.drive.as_mut().map(|d| d.stop()) {
            com_dprintf(&format!("CDAudio: stop failed: {}\n", e));
        }
        self.was_playing = false;
        self.playing = false;
    }

    /// CDAudio_Pause
    pub fn pause(&mut self) {
        if !self.enabled || !self.playing {
            return;
        }
        if let Some(Err(e)) = self.drive.as_mut().map(|d| d.pause()) {
            com_dprintf(&format!("CDAudio: pause failed: {}\n", e));
        }
        self.was_playing = self.playing;
        self.playing = false;
    }

    /// CDAudio_Resume
    pub fn resume(&mut self) {
        if !self.enabled || !self.cd_valid || !self.was_playing {
            return;
        }
        if let Some(Err(e)) = self.drive.as_mut().map(|d| d.resume()) {
            com_dprintf(&format!("CDAudio: resume failed: {}\n", e));
            return;
        }
        self.playing = true;
    }

    pub fn eject(&mut self) {
        if let Some(Err(e)) = self.drive.as_mut().map(|d| d.eject()) {
            com_dprintf(&format!("CDAudio: eject failed: {}\n", e));
        }
    }

    pub fn close_door(&mut self) {
        if let Some(Err(e)) = self.drive.as_mut().map(|d| d.close_tray()) {
            com_dprintf(&format!("CDAudio: close door failed: {}\n", e));
        }
    }

    /// CD_f -- `argv` is the whole command line, argv[0] being "cd".
    pub fn command(&mut self, argv: &[String]) {
        let Some(command) = argv.get(1).map(String::as_str) else {
            return;
        };
        let arg = |i: usize| argv.get(i).map_or("", String::as_str);

        if q_streq_nocase(command, "on") {
            self.enabled = true;
            return;
        }

        if q_streq_nocase(command, "off") {
            if self.playing {
                self.stop();
            }
            self.enabled = false;
            return;
        }

        if q_streq_nocase(command, "reset") {
            self.enabled = true;
            if self.playing {
                self.stop();
            }
            self.remap = identity_remap();
            let _ = self.get_audio_disk_info();
            return;
        }

        if q_streq_nocase(command, "remap") {
            let ret = argv.len().saturating_sub(2);
            if ret == 0 {
                for n in 1..MAX_TRACKS {
                    if self.remap[n] as usize != n {
                        com_printf(&format!("  {} -> {}\n", n, self.remap[n]));
                    }
                }
                return;
            }
            for n in 1..=ret.min(MAX_TRACKS - 1) {
                self.remap[n] = q_atoi(arg(n + 1)) as u8;
            }
            return;
        }

        if q_streq_nocase(command, "close") {
            self.close_door();
            return;
        }

        if !self.cd_valid {
            let _ = self.get_audio_disk_info();
            if !self.cd_valid {
                com_printf("No CD in player.\n");
                return;
            }
        }

        if q_streq_nocase(command, "play") {
            self.play(q_atoi(arg(2)) as u8, false);
        } else if q_streq_nocase(command, "loop") {
            self.play(q_atoi(arg(2)) as u8, true);
        } else if q_streq_nocase(command, "stop") {
            self.stop();
        } else if q_streq_nocase(command, "pause") {
            self.pause();
        } else if q_streq_nocase(command, "resume") {
            self.resume();
        } else if q_streq_nocase(command, "eject") {
            if self.playing {
                self.stop();
            }
            self.eject();
            self.cd_valid = false;
        } else if q_streq_nocase(command, "info") {
            com_printf(&format!("{} tracks\n", self.max_track));
            let mode = if self.play_looping { "looping" } else { "playing" };
            if self.playing {
                com_printf(&format!("Currently {} track {}\n", mode, self.play_track));
            } else if self.was_playing {
                com_printf(&format!("Paused {} track {}\n", mode, self.play_track));
            }
            com_printf(&format!("Volume is {:.6}\n", self.cdvolume));
        }
    }

    /// CDAudio_Update -- called once a frame with the music volume. Returns
    /// the value to write back to the volume cvar when it was toggled.
    pub fn update(&mut self, bgmvolume: f32) -> Option<f32> {
        if !self.enabled {
            return None;
        }

        let mut write_back = None;
        if bgmvolume != self.cdvolume {
            if self.cdvolume != 0.0 {
                self.cdvolume = 0.0;
                self.pause();
            } else {
                self.cdvolume = 1.0;
                self.resume();
            }
            write_back = Some(self.cdvolume);
        }

        if self.playing {
            let status = self.drive.as_mut().map_or(CdStatus::Error, |d| d.status());
            if status != CdStatus::Playing && status != CdStatus::Paused {
                self.playing = false;
                if self.play_looping {
                    self.play_remapped(self.play_track, true);
                }
            }
        }

        write_back
    }

    /// CDAudio_Shutdown
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.stop();
        self.drive = None;
        self.initialized = false;
    }
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CD_STATE: Mutex<Option<CdAudio>> = Mutex::new(None);

/// Access the global CdAudio with a closure. Returns None if CD audio is off.
pub fn with_cd_state<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CdAudio) -> R,
{
    CD_STATE.lock().as_mut().map(f)
}

#[cfg(target_os = "linux")]
fn open_platform_drive(args: &ComArgs) -> Result<Box<dyn CdDrive>, CdError> {
    let device = args.parm_value("-cddev").unwrap_or(crate::cd_linux::DEFAULT_CD_DEVICE);
    let drive = crate::cd_linux::LinuxCdrom::open(device)?;
    Ok(Box::new(drive))
}

#[cfg(not(target_os = "linux"))]
fn open_platform_drive(_args: &ComArgs) -> Result<Box<dyn CdDrive>, CdError> {
    Err(CdError::NoDrive("no CD-ROM backend on this platform".to_string()))
}

/// Bring up CD audio on the platform drive and register the "cd" command.
pub fn cdaudio_init(args: &ComArgs, dedicated: bool) -> Result<(), CdError> {
    cdaudio_init_with(args, dedicated, open_platform_drive)
}

pub fn cdaudio_init_with<F>(args: &ComArgs, dedicated: bool, open_drive: F) -> Result<(), CdError>
where
    F: FnOnce(&ComArgs) -> Result<Box<dyn CdDrive>, CdError>,
{
    let cd = CdAudio::init(args, dedicated, open_drive)?;
    *CD_STATE.lock() = Some(cd);

    cvar_get("bgmvolume", "1", CVAR_ARCHIVE);
    cmd_add_command("cd", Some(Box::new(|ctx: &mut CmdContext| {
        let argv: Vec<String> = (0..ctx.cmd_argc()).map(|i| ctx.cmd_argv(i).to_string()).collect();
        with_cd_state(|cd| cd.command(&argv));
    })));
    Ok(())
}

pub fn cdaudio_play(track: u8, looping: bool) {
    with_cd_state(|cd| cd.play(track, looping));
}

pub fn cdaudio_stop() {
    with_cd_state(|cd| cd.stop());
}

pub fn cdaudio_pause() {
    with_cd_state(|cd| cd.pause());
}

pub fn cdaudio_resume() {
    with_cd_state(|cd| cd.resume());
}

pub fn cdaudio_update() {
    let bgmvolume = cvar_variable_value("bgmvolume");
    if let Some(Some(volume)) = with_cd_state(|cd| cd.update(bgmvolume)) {
        cvar_set_value("bgmvolume", volume);
    }
}

pub fn cdaudio_shutdown() {
    if let Some(mut cd) = CD_STATE.lock().take() {
        cd.shutdown();
    }
}
