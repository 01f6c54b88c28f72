// vid_modes.rs -- video mode list and startup mode selection

use glq_common::common::ComArgs;

use crate::vid_gl::VidError;

pub const MAX_MODE_LIST: usize = 30;
pub const MAXWIDTH: i32 = 10000;
pub const MAXHEIGHT: i32 = 10000;

pub const MODE_WINDOWED: usize = 0;
pub const MODE_FULLSCREEN_DEFAULT: usize = MODE_WINDOWED + 1;

/// Bit depths tried, in order, when no -bpp was given.
const BPP_SEARCH_ORDER: [i32; 4] = [15, 16, 32, 24];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeState {
    #[default]
    Uninit,
    Windowed,
    FullDib,
}

/// One entry of the mode list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMode {
    pub mode_type: ModeState,
    pub width: i32,
    pub height: i32,
    /// Index into the display driver's own mode list (0 for windowed/forced modes).
    pub modenum: usize,
    pub dib: bool,
    pub fullscreen: bool,
    pub bpp: i32,
    pub halfscreen: bool,
    pub modedesc: String,
}

impl VMode {
    fn fullscreen(width: i32, height: i32, bpp: i32, modenum: usize) -> Self {
        Self {
            mode_type: ModeState::FullDib,
            width,
            height,
            modenum,
            dib: true,
            fullscreen: true,
            bpp,
            halfscreen: false,
            modedesc: format!("{}x{}x{}", width, height, bpp),
        }
    }

    fn same_format(&self, width: i32, height: i32, bpp: i32) -> bool {
        self.width == width && self.height == height && self.bpp == bpp
    }
}

/// A display mode as reported by the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverMode {
    pub width: i32,
    pub height: i32,
    pub bpp: i32,
    pub refresh_millihertz: u32,
}

/// Fixed-capacity mode list. Entry 0 is always the windowed mode.
#[derive(Debug, Clone, Default)]
pub struct ModeList {
    pub modes: Vec<VMode>,
}

impl ModeList {
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, modenum: usize) -> Option<&VMode> {
        self.modes.get(modenum)
    }

    pub fn get_mut(&mut self, modenum: usize) -> Option<&mut VMode> {
        self.modes.get_mut(modenum)
    }

    fn is_full(&self) -> bool {
        self.modes.len() >= MAX_MODE_LIST
    }

    fn contains(&self, width: i32, height: i32, bpp: i32) -> bool {
        self.modes[1.min(self.modes.len())..]
            .iter()
            .any(|m| m.same_format(width, height, bpp))
    }

    /// VID_InitDIB -- set up mode 0, the windowed mode, from -width/-height.
    pub fn init_dib(args: &ComArgs) -> Self {
        let width = args.parm_int("-width").unwrap_or(640).clamp(320, MAXWIDTH);
        let height = args
            .parm_int("-height")
            .unwrap_or(width * 240 / 320)
            .clamp(240, MAXHEIGHT);

        Self {
            modes: vec![VMode {
                mode_type: ModeState::Windowed,
                width,
                height,
                modenum: MODE_WINDOWED,
                dib: true,
                fullscreen: false,
                bpp: 0,
                halfscreen: false,
                modedesc: format!("{}x{}", width, height),
            }],
        }
    }

    /// VID_InitFullDIB -- append the usable fullscreen modes the driver reports.
    pub fn init_full_dib(&mut self, driver_modes: &[DriverMode]) {
        for (index, dm) in driver_modes.iter().enumerate() {
            if self.is_full() {
                break;
            }
            if dm.bpp < 15 || dm.width > MAXWIDTH || dm.height > MAXHEIGHT {
                continue;
            }
            if self.contains(dm.width, dm.height, dm.bpp) {
                continue;
            }
            self.modes.push(VMode::fullscreen(dm.width, dm.height, dm.bpp, index));
        }
    }

    /// -force: add the requested mode even if the driver did not report it.
    /// Returns false if it was already present, too large, or the list is full.
    pub fn force_mode(&mut self, width: i32, height: i32, bpp: i32) -> bool {
        if width > MAXWIDTH || height > MAXHEIGHT {
            return false;
        }
        if self.is_full() || self.contains(width, height, bpp) {
            return false;
        }
        self.modes.push(VMode::fullscreen(width, height, bpp, 0));
        true
    }

    /// Search the fullscreen modes for a width (and height, if given) at a depth.
    pub fn find(&self, width: i32, height: Option<i32>, bpp: i32) -> Option<usize> {
        (1..self.modes.len()).find(|&i| {
            let m = &self.modes[i];
            m.width == width && m.bpp == bpp && height.map_or(true, |h| m.height == h)
        })
    }
}

/// Outcome of parsing the video command-line parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSelection {
    pub vid_default: usize,
    pub windowed: bool,
    pub leavecurrentmode: bool,
}

/// Choose the startup mode from -window, -mode, -current, -width, -height,
/// -bpp and -force. `desktop` is the current desktop resolution, used by
/// -current.
pub fn select_default_mode(
    list: &mut ModeList,
    args: &ComArgs,
    desktop: (i32, i32),
) -> Result<ModeSelection, VidError> {
    if args.check_parm("-window").is_some() {
        return Ok(ModeSelection {
            vid_default: MODE_WINDOWED,
            windowed: true,
            leavecurrentmode: false,
        });
    }

    if list.len() <= 1 {
        return Err(VidError::NoFullscreenModes);
    }

    if let Some(mode) = args.parm_int("-mode") {
        return Ok(ModeSelection {
            vid_default: mode.max(0) as usize,
            windowed: false,
            leavecurrentmode: false,
        });
    }

    if args.check_parm("-current").is_some() {
        if let Some(m) = list.get_mut(MODE_FULLSCREEN_DEFAULT) {
            m.width = desktop.0;
            m.height = desktop.1;
        }
        return Ok(ModeSelection {
            vid_default: MODE_FULLSCREEN_DEFAULT,
            windowed: false,
            leavecurrentmode: true,
        });
    }

    let width = args.parm_int("-width").unwrap_or(640);
    let height = args.parm_int("-height");
    let requested_bpp = args.parm_int("-bpp");

    if args.check_parm("-force").is_some() {
        // without -height the forced mode takes the usual 4:3 shape
        let h = height.unwrap_or((i64::from(width) * 3 / 4) as i32);
        list.force_mode(width, h, requested_bpp.unwrap_or(BPP_SEARCH_ORDER[0]));
    }

    let found = match requested_bpp {
        Some(bpp) => list.find(width, height, bpp),
        None => BPP_SEARCH_ORDER
            .iter()
            .find_map(|&bpp| list.find(width, height, bpp)),
    };

    match found {
        Some(vid_default) => Ok(ModeSelection {
            vid_default,
            windowed: false,
            leavecurrentmode: false,
        }),
        None => Err(VidError::ModeNotAvailable),
    }
}

// ============================================================
// Mode descriptions
// ============================================================

fn desktop_description(list: &ModeList) -> String {
    let (w, h) = list
        .get(MODE_FULLSCREEN_DEFAULT)
        .map_or((0, 0), |m| (m.width, m.height));
    format!("Desktop resolution ({}x{})", w, h)
}

/// VID_GetModeDescription
pub fn describe_mode(list: &ModeList, mode: usize, leavecurrentmode: bool) -> Option<String> {
    let pv = list.get(mode)?;
    if leavecurrentmode {
        Some(desktop_description(list))
    } else {
        Some(pv.modedesc.clone())
    }
}

/// VID_GetExtModeDescription -- description with the window type appended,
/// as shown on the console.
pub fn describe_ext_mode(
    list: &ModeList,
    mode: usize,
    leavecurrentmode: bool,
    modestate: ModeState,
) -> Option<String> {
    let pv = list.get(mode)?;
    let desc = if pv.mode_type == ModeState::FullDib {
        if leavecurrentmode {
            desktop_description(list)
        } else {
            format!("{} fullscreen", pv.modedesc)
        }
    } else if modestate == ModeState::Windowed {
        format!("{} windowed", pv.modedesc)
    } else {
        "windowed".to_string()
    };
    Some(desc)
}

pub fn nummodes_message(nummodes: usize) -> String {
    if nummodes == 1 {
        format!("{} video mode is available", nummodes)
    } else {
        format!("{} video modes are available", nummodes)
    }
}
