/*!
# Cuerip: `libcdio`-backed Source

A real optical-drive source, gated behind the `cdio` feature. Only the
operations the [`Source`](crate::source::Source) contract needs are wrapped;
re-read/paranoia/subchannel-sync concerns the teacher's own `libcdio` layer
handles are out of scope here.
*/

use crate::{
	CueError,
	error::DeviceErrorKind,
	model::{CueSheet, Index, Track, TrackKind},
	source::{LengthUnit, Source},
};
use libcdio_sys::{
	cdio_track_enums_CDIO_CDROM_LEADOUT_TRACK,
	discmode_t_CDIO_DISC_MODE_CD_DA,
	discmode_t_CDIO_DISC_MODE_CD_MIXED,
	driver_id_t_DRIVER_DEVICE,
	driver_return_code_t_DRIVER_OP_SUCCESS,
	track_format_t_TRACK_FORMAT_AUDIO,
};
use std::{
	ffi::CString,
	os::unix::ffi::OsStrExt,
	path::Path,
	sync::Once,
};

/// # Bytes Per CDDA Sector.
const CD_DATA_SIZE: u16 = 2352;

/// # Lead-in Sectors.
const CD_LEADIN: u32 = 150;

/// # Initialization Counter.
static LIBCDIO_INIT: Once = Once::new();

#[allow(unsafe_code)]
fn init() {
	LIBCDIO_INIT.call_once(|| unsafe { libcdio_sys::cdio_init(); });
}



#[derive(Debug)]
/// # `libcdio` Instance.
///
/// RAII wrapper; the underlying handle is destroyed on drop.
struct Instance(*mut libcdio_sys::CdIo_t);

impl Drop for Instance {
	#[allow(unsafe_code)]
	fn drop(&mut self) {
		if ! self.0.is_null() {
			unsafe { libcdio_sys::cdio_destroy(self.0); }
		}
	}
}

// Safety: the handle is only ever touched from the single thread that owns
// the `CdioSource`; `Source::read_sector` takes `&mut self`.
#[allow(unsafe_code)]
unsafe impl Send for Instance {}

impl Instance {
	#[allow(unsafe_code)]
	fn open(dev: Option<&Path>) -> Result<Self, CueError> {
		init();

		let cdev = match dev {
			Some(p) => Some(
				CString::new(p.as_os_str().as_bytes())
					.map_err(|_| CueError::Device(DeviceErrorKind::NoDrive))?
			),
			None => None,
		};

		let ptr = unsafe {
			libcdio_sys::cdio_open(
				cdev.as_ref().map_or_else(std::ptr::null, |v| v.as_ptr()),
				driver_id_t_DRIVER_DEVICE,
			)
		};

		if ptr.is_null() { return Err(CueError::Device(DeviceErrorKind::OpenFailed)); }

		let out = Self(ptr);
		out.check_disc_mode()?;
		Ok(out)
	}

	#[allow(unsafe_code)]
	fn check_disc_mode(&self) -> Result<(), CueError> {
		let mode = unsafe { libcdio_sys::cdio_get_discmode(self.0) };
		if matches!(mode, discmode_t_CDIO_DISC_MODE_CD_DA | discmode_t_CDIO_DISC_MODE_CD_MIXED) {
			Ok(())
		}
		else { Err(CueError::Device(DeviceErrorKind::OpenFailed)) }
	}

	#[allow(unsafe_code)]
	fn num_tracks(&self) -> Result<u8, CueError> {
		let raw = unsafe { libcdio_sys::cdio_get_num_tracks(self.0) };
		if raw == 0 { Err(CueError::Device(DeviceErrorKind::IdFailed)) } else { Ok(raw) }
	}

	#[allow(unsafe_code)]
	fn first_track_num(&self) -> Result<u8, CueError> {
		let raw = unsafe { libcdio_sys::cdio_get_first_track_num(self.0) };
		if raw == 0 { Err(CueError::Device(DeviceErrorKind::IdFailed)) } else { Ok(raw) }
	}

	#[allow(unsafe_code)]
	fn track_is_audio(&self, idx: u8) -> bool {
		unsafe { libcdio_sys::cdio_get_track_format(self.0, idx) == track_format_t_TRACK_FORMAT_AUDIO }
	}

	#[allow(unsafe_code)]
	fn track_lba_start(&self, idx: u8) -> Result<u32, CueError> {
		let raw = unsafe { libcdio_sys::cdio_get_track_lsn(self.0, idx) };
		if raw < 0 { Err(CueError::Device(DeviceErrorKind::IdFailed)) }
		else { Ok(raw.abs_diff(0) + CD_LEADIN) }
	}

	fn leadout_lba(&self) -> Result<u32, CueError> {
		let idx = u8::try_from(cdio_track_enums_CDIO_CDROM_LEADOUT_TRACK).unwrap_or(170);
		self.track_lba_start(idx)
	}

	#[allow(unsafe_code)]
	fn read_sector(&self, buf: &mut [u8; CD_DATA_SIZE as usize], lsn: i32) -> Result<(), CueError> {
		let res = unsafe {
			libcdio_sys::mmc_read_cd(
				self.0,
				buf.as_mut_ptr().cast(),
				lsn,
				1, 0, 0, 0, 1, 0, 0, 0,
				CD_DATA_SIZE,
				1,
			)
		};
		if res == driver_return_code_t_DRIVER_OP_SUCCESS { Ok(()) }
		else { Err(CueError::Device(DeviceErrorKind::ReadFailed)) }
	}
}



/// # `libcdio`-backed Source.
pub struct CdioSource {
	inst: Instance,
	path: String,
	lsn: i32,
	leadout: i32,
	buf: [u8; CD_DATA_SIZE as usize],
}

impl CdioSource {
	/// # New.
	///
	/// # Errors
	/// Returns [`CueError::Device`] if no drive/disc is found or usable.
	pub fn new(dev: Option<&Path>) -> Result<Self, CueError> {
		let inst = Instance::open(dev)?;
		let leadout = inst.leadout_lba()? as i32;
		Ok(Self {
			inst,
			path: dev.map(|p| p.to_string_lossy().into_owned()).unwrap_or_else(|| "auto".to_owned()),
			lsn: CD_LEADIN as i32,
			leadout,
			buf: [0_u8; CD_DATA_SIZE as usize],
		})
	}
}

impl Source for CdioSource {
	fn device_path(&self) -> &str { &self.path }

	fn samples_per_sector(&self) -> u16 { 588 }

	fn read_sector(&mut self) -> Result<Option<&[u8]>, CueError> {
		if self.lsn >= self.leadout { return Ok(None); }
		self.inst.read_sector(&mut self.buf, self.lsn)?;
		self.lsn += 1;
		Ok(Some(&self.buf[..]))
	}

	fn rewind(&mut self) { self.lsn = CD_LEADIN as i32; }

	fn length(&self, unit: LengthUnit) -> u64 {
		let sectors = (self.leadout - CD_LEADIN as i32).max(0) as u64;
		match unit {
			LengthUnit::Sectors => sectors,
			LengthUnit::Seconds => sectors / 75,
			LengthUnit::HalfWords => sectors * 588 * 2,
			LengthUnit::Bytes => sectors * u64::from(CD_DATA_SIZE),
		}
	}

	fn build_cuesheet(&self) -> Result<CueSheet, CueError> {
		let mut cs = CueSheet::default();
		let first = self.inst.first_track_num()?;
		let total = self.inst.num_tracks()?;

		for idx in first..=total {
			if ! self.inst.track_is_audio(idx) { continue; }

			let number = cs.len() as u8 + 1;
			let mut track = Track::new(number, TrackKind::Audio)
				.ok_or(CueError::Device(DeviceErrorKind::IdFailed))?;
			let lba = self.inst.track_lba_start(idx)?;
			track.push_index(Index::new(1, lba).ok_or(CueError::Bug("bad index"))?)?;
			cs.push_track(track)?;
		}

		Ok(cs)
	}
}
