// palette.rs -- gamma correction, 8-bit to 24-bit table and 15-bit to 8-bit table

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

use glq_common::common::ComArgs;

use crate::gl_imp::GlInfo;

pub const PALETTE_BYTES: usize = 768;
pub const TABLE15_SIZE: usize = 1 << 15;

/// One palette entry as stored in palette.lmp.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Gamma for the palette: -gamma wins, otherwise 3Dfx boards get 1.0 and
/// everything else 0.7.
pub fn gamma_for(args: &ComArgs, gl_info: &GlInfo) -> f32 {
    if let Some(gamma) = args.parm_float("-gamma") {
        return gamma;
    }
    if gl_info.is_3dfx {
        1.0
    } else {
        0.7
    }
}

/// Check_Gamma -- correct every palette byte for monitor gamma.
pub fn apply_gamma(palette: &mut [u8], gamma: f32) {
    for p in palette.iter_mut() {
        let f = ((*p as f64 + 1.0) / 256.0).powf(gamma as f64);
        *p = (f * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
    }
}

/// The tables texture upload reads: 8-bit index -> RGBA, and 15-bit RGB ->
/// nearest 8-bit index.
pub struct PaletteTables {
    pub table24: [u32; 256],
    pub table15to8: Vec<u8>,
}

impl PaletteTables {
    /// VID_SetPalette. `palette` must hold 256 RGB triplets; a short palette
    /// leaves the missing entries black.
    pub fn build(palette: &[u8]) -> Self {
        let mut entries = [Rgb::default(); 256];
        let usable = palette.len().min(PALETTE_BYTES) / 3 * 3;
        let src: &[Rgb] = bytemuck::cast_slice(&palette[..usable]);
        entries[..src.len()].copy_from_slice(src);

        let mut table24 = [0u32; 256];
        for (dst, c) in table24.iter_mut().zip(entries.iter()) {
            *dst = 0xff00_0000 | c.r as u32 | (c.g as u32) << 8 | (c.b as u32) << 16;
        }
        // 255 is transparent
        table24[255] &= 0x00ff_ffff;

        let table15to8 = (0..TABLE15_SIZE)
            .into_par_iter()
            .map(|i| nearest_index(&table24, i))
            .collect();

        Self { table24, table15to8 }
    }

    /// Nearest palette index for an 8-bit-per-channel color.
    pub fn quantize(&self, r: u8, g: u8, b: u8) -> u8 {
        let i = (r as usize >> 3) | ((g as usize >> 3) << 5) | ((b as usize >> 3) << 10);
        self.table15to8[i]
    }

    /// The 24-bit table packed back into 256 RGB triplets.
    pub fn rgb_triplets(&self) -> Vec<u8> {
        let entries: Vec<Rgb> = self
            .table24
            .iter()
            .map(|&v| Rgb { r: v as u8, g: (v >> 8) as u8, b: (v >> 16) as u8 })
            .collect();
        bytemuck::cast_slice(&entries).to_vec()
    }
}

/// Red is the low five bits, green the middle five, blue the high five.
fn nearest_index(table24: &[u32; 256], i: usize) -> u8 {
    let r = (((i & 0x1f) << 3) + 4) as i32;
    let g = (((i & 0x3e0) >> 2) + 4) as i32;
    let b = (((i & 0x7c00) >> 7) + 4) as i32;

    let mut best = 0usize;
    let mut best_dist = i32::MAX;
    for (v, &c) in table24.iter().enumerate() {
        let r1 = r - (c & 0xff) as i32;
        let g1 = g - ((c >> 8) & 0xff) as i32;
        let b1 = b - ((c >> 16) & 0xff) as i32;
        let dist = r1 * r1 + g1 * g1 + b1 * b1;
        if dist < best_dist {
            best = v;
            best_dist = dist;
        }
    }
    best as u8
}
