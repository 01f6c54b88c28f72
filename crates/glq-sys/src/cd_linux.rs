// cd_linux.rs -- Linux CD-ROM audio through the cdrom.h ioctls

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use crate::cd_audio::{CdDrive, CdError, CdStatus};

pub const DEFAULT_CD_DEVICE: &str = "/dev/cdrom";

const CDROMPAUSE: u64 = 0x5301;
const CDROMRESUME: u64 = 0x5302;
const CDROMPLAYTRKIND: u64 = 0x5304;
const CDROMREADTOCHDR: u64 = 0x5305;
const CDROMREADTOCENTRY: u64 = 0x5306;
const CDROMSTOP: u64 = 0x5307;
const CDROMEJECT: u64 = 0x5309;
const CDROMSUBCHNL: u64 = 0x530b;
const CDROMCLOSETRAY: u64 = 0x5319;
const CDROM_DRIVE_STATUS: u64 = 0x5326;

const CDSL_CURRENT: libc::c_int = libc::c_int::MAX;

const CDS_NO_DISC: i32 = 1;
const CDS_TRAY_OPEN: i32 = 2;
const CDS_DRIVE_NOT_READY: i32 = 3;

const CDROM_AUDIO_PLAY: u8 = 0x11;
const CDROM_AUDIO_PAUSED: u8 = 0x12;
const CDROM_AUDIO_ERROR: u8 = 0x14;

const CDROM_MSF: u8 = 0x02;
const CDROM_DATA_TRACK: u8 = 0x04;

#[repr(C)]
#[derive(Default)]
#[allow(dead_code)]
struct CdromTocHdr {
    cdth_trk0: u8,
    cdth_trk1: u8,
}

#[repr(C)]
#[derive(Default)]
#[allow(dead_code)]
struct CdromTocEntry {
    cdte_track: u8,
    /// adr in the low nibble, ctrl in the high nibble.
    cdte_adr_ctrl: u8,
    cdte_format: u8,
    cdte_addr: i32,
    cdte_datamode: u8,
}

#[repr(C)]
#[derive(Default)]
struct CdromTi {
    cdti_trk0: u8,
    cdti_ind0: u8,
    cdti_trk1: u8,
    cdti_ind1: u8,
}

#[repr(C)]
#[derive(Default)]
#[allow(dead_code)]
struct CdromSubchnl {
    cdsc_format: u8,
    cdsc_audiostatus: u8,
    cdsc_adr_ctrl: u8,
    cdsc_trk: u8,
    cdsc_ind: u8,
    cdsc_absaddr: i32,
    cdsc_reladdr: i32,
}

pub struct LinuxCdrom {
    file: File,
}

impl LinuxCdrom {
    pub fn open(device: &str) -> Result<Self, CdError> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(device)
            .map_err(|e| {
                log::warn!("CDAudio: open of \"{}\" failed: {}", device, e);
                CdError::NoDrive(format!("{}: {}", device, e))
            })?;
        Ok(Self { file })
    }

    fn ioctl_with<T>(&self, request: u64, arg: &mut T) -> Result<i32, CdError> {
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg as *mut T) };
        if ret < 0 {
            return Err(CdError::Io(std::io::Error::last_os_error()));
        }
        Ok(ret)
    }

    fn ioctl_int(&self, request: u64, arg: libc::c_int) -> Result<i32, CdError> {
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg) };
        if ret < 0 {
            return Err(CdError::Io(std::io::Error::last_os_error()));
        }
        Ok(ret)
    }

    fn audio_status(&self) -> CdStatus {
        let mut subchnl = CdromSubchnl { cdsc_format: CDROM_MSF, ..Default::default() };
        match self.ioctl_with(CDROMSUBCHNL, &mut subchnl) {
            Ok(_) => match subchnl.cdsc_audiostatus {
                CDROM_AUDIO_PLAY => CdStatus::Playing,
                CDROM_AUDIO_PAUSED => CdStatus::Paused,
                CDROM_AUDIO_ERROR => CdStatus::Error,
                _ => CdStatus::Stopped,
            },
            Err(e) => {
                log::debug!("CDAudio: ioctl cdromsubchnl failed: {}", e);
                CdStatus::Error
            }
        }
    }
}

impl CdDrive for LinuxCdrom {
    fn status(&mut self) -> CdStatus {
        match self.ioctl_int(CDROM_DRIVE_STATUS, CDSL_CURRENT) {
            Ok(CDS_NO_DISC) | Ok(CDS_DRIVE_NOT_READY) => CdStatus::NoDisc,
            Ok(CDS_TRAY_OPEN) => CdStatus::TrayOpen,
            // drives that can't report status still answer the subchannel query
            _ => self.audio_status(),
        }
    }

    fn track_count(&mut self) -> Result<u8, CdError> {
        let mut hdr = CdromTocHdr::default();
        self.ioctl_with(CDROMREADTOCHDR, &mut hdr)?;
        log::debug!("CDAudio: tracks {}..{}", hdr.cdth_trk0, hdr.cdth_trk1);
        Ok(hdr.cdth_trk1)
    }

    fn is_audio_track(&mut self, track: u8) -> Result<bool, CdError> {
        let mut entry = CdromTocEntry {
            cdte_track: track,
            cdte_format: CDROM_MSF,
            ..Default::default()
        };
        self.ioctl_with(CDROMREADTOCENTRY, &mut entry)?;
        Ok((entry.cdte_adr_ctrl >> 4) & CDROM_DATA_TRACK == 0)
    }

    fn play_track(&mut self, track: u8) -> Result<(), CdError> {
        let mut ti = CdromTi {
            cdti_trk0: track,
            cdti_ind0: 1,
            cdti_trk1: track,
            cdti_ind1: 99,
        };
        self.ioctl_with(CDROMPLAYTRKIND, &mut ti)?;
        self.ioctl_int(CDROMRESUME, 0)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CdError> {
        self.ioctl_int(CDROMSTOP, 0).map(|_| ())
    }

    fn pause(&mut self) -> Result<(), CdError> {
        self.ioctl_int(CDROMPAUSE, 0).map(|_| ())
    }

    fn resume(&mut self) -> Result<(), CdError> {
        self.ioctl_int(CDROMRESUME, 0).map(|_| ())
    }

    fn eject(&mut self) -> Result<(), CdError> {
        self.ioctl_int(CDROMEJECT, 0).map(|_| ())
    }

    fn close_tray(&mut self) -> Result<(), CdError> {
        self.ioctl_int(CDROMCLOSETRAY, 0).map(|_| ())
    }
}
