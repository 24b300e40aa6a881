//! Headless driver for the session controller.
//!
//! Pairs a [`SessionController`] with the headless tracker and scene and
//! executes user actions from the command line or a line-oriented shell. All
//! actions run on the calling thread, one at a time.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;

use crate::codec::{Position, Transform};
use crate::data::{AppStateStore, Database};
use crate::session::{
    HeadlessScene, HeadlessTracker, ScreenPoint, SessionController, SessionError, StartupReport,
};

/// Parse a transform from comma-separated components.
///
/// Three values are a translation; sixteen are the row-major `m11..m44`.
pub fn parse_transform(s: &str) -> Result<Transform, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|e| format!("invalid component in '{}': {}", s, e))?;

    let transform = match values.as_slice() {
        &[x, y, z] => Transform::from_translation(Position::new(x, y, z)),
        v if v.len() == 16 => {
            let mut rows = [[0.0f32; 4]; 4];
            for (i, value) in v.iter().enumerate() {
                rows[i / 4][i % 4] = *value;
            }
            Transform::from_rows(rows)
        }
        v => {
            return Err(format!(
                "expected 3 or 16 components, got {} in '{}'",
                v.len(),
                s
            ))
        }
    };

    if !transform.is_finite() {
        return Err(format!("non-finite component in '{}'", s));
    }
    Ok(transform)
}

/// One user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Touch the screen; the tracker reports `hit` as the surface transform
    Tap(Option<Transform>),
    /// Set or clear the current camera pose
    Camera(Option<Transform>),
    RecordViewpoint,
    AdvanceDevice,
    PrintViewpoints,
    Distances,
    Reset,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments in '{}'", line.trim()));
        }

        let transform = |arg: Option<&str>| arg.map(parse_transform).transpose();

        match name {
            "tap" => Ok(Command::Tap(transform(arg)?)),
            "camera" => match arg {
                Some("none") => Ok(Command::Camera(None)),
                _ => Ok(Command::Camera(transform(arg)?)),
            },
            "record" => Ok(Command::RecordViewpoint),
            "advance" => Ok(Command::AdvanceDevice),
            "viewpoints" => Ok(Command::PrintViewpoints),
            "distances" => Ok(Command::Distances),
            "reset" => Ok(Command::Reset),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

const HELP: &str = "\
tap [x,y,z | m11,...,m44]   place a marker where the touch hits
camera <x,y,z | ... | none> set the current camera pose
record                      log the camera position for this device
advance                     switch to the next device ordinal
viewpoints                  print all logged viewpoints
distances                   distance from the camera to each marker
reset                       clear markers, anchors and viewpoints
status                      show collection sizes and device
quit                        leave the shell";

/// Whether the shell keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct Coords(Position);

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

pub struct HeadlessApp {
    controller: SessionController,
    tracker: HeadlessTracker,
    scene: HeadlessScene,
    startup: StartupReport,
}

impl HeadlessApp {
    /// Restore the saved layout from `database`.
    pub fn open(database: &Database) -> Result<Self, SessionError> {
        let mut tracker = HeadlessTracker::default();
        let mut scene = HeadlessScene::default();
        let (controller, startup) = SessionController::start(
            AppStateStore::new(database.connection()),
            &mut tracker,
            &mut scene,
        )?;

        Ok(Self {
            controller,
            tracker,
            scene,
            startup,
        })
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn tracker(&self) -> &HeadlessTracker {
        &self.tracker
    }

    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    /// Describe what the restore did, including any skipped entries.
    pub fn write_startup<W: Write>(&self, out: &mut W) -> Result<()> {
        for collection in [&self.startup.anchors, &self.startup.markers] {
            writeln!(
                out,
                "restored {} {}",
                collection.restored, collection.collection
            )?;
        }
        self.write_warnings(out)
    }

    /// Only what went wrong during the restore; prints nothing on a clean start.
    pub fn write_warnings<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = &self.startup;
        for error in &report.load.corrupt {
            writeln!(out, "warning: {}", error)?;
        }
        for collection in [&report.anchors, &report.markers] {
            for failure in &collection.failures {
                writeln!(
                    out,
                    "warning: {} entry {} skipped: {}",
                    collection.collection, failure.index, failure.error
                )?;
            }
        }
        if let Some(error) = &report.device_error {
            writeln!(out, "warning: device ordinal not resumed: {}", error)?;
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Tap(hit) => {
                self.tracker.set_hit(hit);
                let placed = self.controller.handle_touch(
                    ScreenPoint::new(0.0, 0.0),
                    &mut self.tracker,
                    &mut self.scene,
                )?;
                match placed {
                    Some(position) => writeln!(out, "placed marker at {}", Coords(position))?,
                    None => writeln!(out, "no surface hit")?,
                }
            }
            Command::Camera(camera) => {
                self.tracker.set_camera(camera);
                match camera {
                    Some(t) => writeln!(out, "camera at {}", Coords(t.translation()))?,
                    None => writeln!(out, "camera cleared")?,
                }
            }
            Command::RecordViewpoint => {
                let entry = self.controller.record_viewpoint(&self.tracker)?;
                writeln!(
                    out,
                    "recorded viewpoint for device {} at {}",
                    entry.device,
                    Coords(entry.position)
                )?;
            }
            Command::AdvanceDevice => {
                let device = self.controller.advance_device();
                writeln!(out, "device {}", device)?;
            }
            Command::PrintViewpoints => {
                for (index, entry) in self.controller.viewpoint_log().into_iter().enumerate() {
                    match entry {
                        Ok(v) => writeln!(out, "device {}: {}", v.device, Coords(v.position))?,
                        Err(e) => writeln!(out, "entry {}: malformed ({})", index, e)?,
                    }
                }
            }
            Command::Distances => {
                let distances = self.controller.marker_distances(&self.tracker)?;
                for (index, distance) in distances.iter().enumerate() {
                    writeln!(out, "marker {}: {:.3}", index, distance)?;
                }
            }
            Command::Reset => {
                self.controller.reset_all()?;
                writeln!(out, "cleared markers, anchors and viewpoints")?;
            }
            Command::Status => {
                let state = self.controller.state();
                writeln!(
                    out,
                    "markers: {}, anchors: {}, viewpoints: {}, device: {}",
                    state.markers().len(),
                    state.anchors().len(),
                    state.viewpoints().len(),
                    self.controller.device()
                )?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands line by line until EOF or `quit`. Failed commands are
    /// reported and the loop goes on.
    pub fn run_shell<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };

            match self.execute(command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Command failed");
                    writeln!(out, "error: {:#}", e)?;
                }
            }
        }
        Ok(())
    }
}
