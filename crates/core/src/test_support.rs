//! Fixtures shared by the unit tests: a minimal big-endian TIFF/EXIF payload
//! wrapped in a JPEG APP1 segment.

use std::fs;
use std::path::Path;

const TAG_MAKE: u16 = 0x010F;
const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_DATE_TIME_DIGITIZED: u16 = 0x9004;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExifDates<'a> {
    pub original: Option<&'a str>,
    pub digitized: Option<&'a str>,
    pub image: Option<&'a str>,
}

pub(crate) fn write_exif_jpeg(path: &Path, dates: &ExifDates<'_>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dirs must be creatable");
    }
    fs::write(path, exif_jpeg_bytes(dates)).expect("fixture must be writable");
}

pub(crate) fn exif_jpeg_bytes(dates: &ExifDates<'_>) -> Vec<u8> {
    let tiff = tiff_bytes(dates);
    let segment_len = u16::try_from(tiff.len() + 2 + 6).expect("fixture fits in one segment");

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fn tiff_bytes(dates: &ExifDates<'_>) -> Vec<u8> {
    let mut ifd0 = vec![(TAG_MAKE, ascii("TestCam"))];
    if let Some(value) = dates.image {
        ifd0.push((TAG_DATE_TIME, ascii(value)));
    }

    let mut exif_ifd = Vec::new();
    if let Some(value) = dates.original {
        exif_ifd.push((TAG_DATE_TIME_ORIGINAL, ascii(value)));
    }
    if let Some(value) = dates.digitized {
        exif_ifd.push((TAG_DATE_TIME_DIGITIZED, ascii(value)));
    }

    let has_exif = !exif_ifd.is_empty();
    let ifd0_count = ifd0.len() + usize::from(has_exif);
    let ifd0_offset = 8usize;
    let exif_offset = ifd0_offset + ifd_size(ifd0_count);
    let mut data_offset = exif_offset
        + if has_exif {
            ifd_size(exif_ifd.len())
        } else {
            0
        };

    let mut out = Vec::new();
    let mut data = Vec::new();
    out.extend_from_slice(b"MM\0\x2a");
    out.extend_from_slice(&(ifd0_offset as u32).to_be_bytes());

    out.extend_from_slice(&(ifd0_count as u16).to_be_bytes());
    for (tag, value) in &ifd0 {
        push_ascii_entry(&mut out, &mut data, &mut data_offset, *tag, value);
    }
    if has_exif {
        out.extend_from_slice(&TAG_EXIF_IFD_POINTER.to_be_bytes());
        out.extend_from_slice(&TYPE_LONG.to_be_bytes());
        out.extend_from_slice(&1u32.to_be_bytes());
        out.extend_from_slice(&(exif_offset as u32).to_be_bytes());
    }
    out.extend_from_slice(&0u32.to_be_bytes());

    if has_exif {
        out.extend_from_slice(&(exif_ifd.len() as u16).to_be_bytes());
        for (tag, value) in &exif_ifd {
            push_ascii_entry(&mut out, &mut data, &mut data_offset, *tag, value);
        }
        out.extend_from_slice(&0u32.to_be_bytes());
    }

    out.extend_from_slice(&data);
    out
}

fn ifd_size(entries: usize) -> usize {
    2 + 12 * entries + 4
}

fn ascii(value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn push_ascii_entry(
    out: &mut Vec<u8>,
    data: &mut Vec<u8>,
    data_offset: &mut usize,
    tag: u16,
    value: &[u8],
) {
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&TYPE_ASCII.to_be_bytes());
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());

    if value.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..value.len()].copy_from_slice(value);
        out.extend_from_slice(&inline);
        return;
    }

    out.extend_from_slice(&(*data_offset as u32).to_be_bytes());
    data.extend_from_slice(value);
    *data_offset += value.len();
    // word alignment
    if value.len() % 2 == 1 {
        data.push(0);
        *data_offset += 1;
    }
}
