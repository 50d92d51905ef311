use std::time::Duration;

/// Observational progress snapshot for a running FFmpeg invocation.
/// Progress has no control function beyond observation; it never gates
/// success.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegProgress {
    pub duration_s: Option<f64>,
    pub elapsed_s: f64,
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    pub speed: Option<f64>,
}

impl FfmpegProgress {
    pub fn percentage(&self) -> Option<f64> {
        let duration = self.duration_s?;
        if duration <= 0.0 {
            return None;
        }
        Some((self.elapsed_s / duration * 100.0).clamp(0.0, 100.0))
    }

    pub fn eta_seconds(&self) -> Option<f64> {
        let duration = self.duration_s?;
        let speed = self.speed.filter(|s| *s > 0.0)?;
        let remaining = (duration - self.elapsed_s).max(0.0);
        Some(remaining / speed)
    }
}

/// Dedicated line reader state machine: `NoDuration -> HasDuration ->
/// Progressing`. Feed it stderr lines one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    NoDuration,
    HasDuration,
    Progressing,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressParser {
    state: ProgressState,
    progress: FfmpegProgress,
}

impl Default for ProgressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressParser {
    pub fn new() -> Self {
        Self {
            state: ProgressState::NoDuration,
            progress: FfmpegProgress::default(),
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn snapshot(&self) -> FfmpegProgress {
        self.progress
    }

    /// Feed one line of FFmpeg stderr. Returns the updated snapshot
    /// whenever the line carried new progress information.
    pub fn feed(&mut self, line: &str) -> Option<FfmpegProgress> {
        if self.state == ProgressState::NoDuration {
            if let Some(d) = parse_duration(line) {
                self.progress.duration_s = Some(d);
                self.state = ProgressState::HasDuration;
                return Some(self.progress);
            }
        }

        if let Some(t) = parse_time(line) {
            self.progress.elapsed_s = t;
            self.state = ProgressState::Progressing;
            if let Some(frame) = parse_u64_field(line, "frame=") {
                self.progress.frame = Some(frame);
            }
            if let Some(fps) = parse_f64_field(line, "fps=") {
                self.progress.fps = Some(fps);
            }
            if let Some(speed) = parse_speed(line) {
                self.progress.speed = Some(speed);
            }
            return Some(self.progress);
        }

        None
    }
}

fn parse_duration(line: &str) -> Option<f64> {
    let idx = line.find("Duration:")?;
    let rest = &line[idx + "Duration:".len()..];
    let ts = rest.trim().split(',').next()?.trim();
    parse_timestamp(ts)
}

fn parse_time(line: &str) -> Option<f64> {
    let idx = line.find("time=")?;
    let rest = &line[idx + "time=".len()..];
    let ts: String = rest
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ':' || *c == '.')
        .collect();
    parse_timestamp(&ts)
}

fn parse_timestamp(ts: &str) -> Option<f64> {
    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_u64_field(line: &str, key: &str) -> Option<u64> {
    let idx = line.find(key)?;
    let rest = &line[idx + key.len()..];
    let digits: String = rest.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_f64_field(line: &str, key: &str) -> Option<f64> {
    let idx = line.find(key)?;
    let rest = &line[idx + key.len()..];
    let digits: String = rest
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

fn parse_speed(line: &str) -> Option<f64> {
    let idx = line.find("speed=")?;
    let rest = &line[idx + "speed=".len()..];
    let digits: String = rest
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

pub fn as_duration(progress: &FfmpegProgress) -> Option<Duration> {
    progress.duration_s.map(Duration::from_secs_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_then_progresses() {
        let mut parser = ProgressParser::new();
        assert!(parser.feed("not a relevant line").is_none());
        assert_eq!(parser.state(), ProgressState::NoDuration);

        parser.feed("  Duration: 00:01:40.00, start: 0.000000, bitrate: 128 kb/s");
        assert_eq!(parser.state(), ProgressState::HasDuration);
        assert_eq!(parser.snapshot().duration_s, Some(100.0));

        parser.feed("frame=  120 fps= 30 q=28.0 size=    256kB time=00:00:50.00 bitrate= 100.0kbits/s speed=1.0x");
        assert_eq!(parser.state(), ProgressState::Progressing);
        let snap = parser.snapshot();
        assert_eq!(snap.elapsed_s, 50.0);
        assert_eq!(snap.frame, Some(120));
        assert_eq!(snap.percentage(), Some(50.0));
    }

    #[test]
    fn percentage_is_none_without_duration() {
        let progress = FfmpegProgress {
            elapsed_s: 5.0,
            ..Default::default()
        };
        assert!(progress.percentage().is_none());
    }
}
