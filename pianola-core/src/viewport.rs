/// Failure of a display-mode request.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("{0} is not supported by this display")]
    Unsupported(&'static str),
    #[error("{0} was denied")]
    Denied(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The surface hosting the keyboard, as far as fullscreen is concerned.
pub trait Viewport {
    fn is_fullscreen(&self) -> bool;

    fn request_fullscreen(&mut self) -> Result<(), ViewportError>;

    fn exit_fullscreen(&mut self) -> Result<(), ViewportError>;

    fn supports_orientation_lock(&self) -> bool {
        false
    }

    fn lock_landscape(&mut self) -> Result<(), ViewportError> {
        Err(ViewportError::Unsupported("orientation lock"))
    }
}

/// Enter or leave fullscreen. On entry, landscape is locked where supported.
///
/// Failures are logged and dropped; the returned flag is the viewport's
/// state afterwards.
pub fn toggle_fullscreen(viewport: &mut dyn Viewport) -> bool {
    if viewport.is_fullscreen() {
        if let Err(e) = viewport.exit_fullscreen() {
            log::error!(target: "viewport", "error leaving full-screen mode: {}", e);
        }
        return viewport.is_fullscreen();
    }

    if let Err(e) = enter_fullscreen(viewport) {
        log::error!(target: "viewport", "error attempting to enable full-screen mode: {}", e);
    }
    viewport.is_fullscreen()
}

fn enter_fullscreen(viewport: &mut dyn Viewport) -> Result<(), ViewportError> {
    viewport.request_fullscreen()?;
    if viewport.supports_orientation_lock() {
        viewport.lock_landscape()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeViewport {
        fullscreen: bool,
        deny: bool,
        orientation: bool,
        fail_lock: bool,
        locked: bool,
    }

    impl Viewport for FakeViewport {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<(), ViewportError> {
            if self.deny {
                return Err(ViewportError::Denied("fullscreen"));
            }
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) -> Result<(), ViewportError> {
            self.fullscreen = false;
            Ok(())
        }

        fn supports_orientation_lock(&self) -> bool {
            self.orientation
        }

        fn lock_landscape(&mut self) -> Result<(), ViewportError> {
            if self.fail_lock {
                return Err(ViewportError::Unsupported("orientation lock"));
            }
            self.locked = true;
            Ok(())
        }
    }

    #[test]
    fn toggles_on_and_off() {
        let mut v = FakeViewport::default();
        assert!(toggle_fullscreen(&mut v));
        assert!(!toggle_fullscreen(&mut v));
    }

    #[test]
    fn denial_is_swallowed() {
        let mut v = FakeViewport { deny: true, ..Default::default() };
        assert!(!toggle_fullscreen(&mut v));
    }

    #[test]
    fn locks_landscape_when_supported() {
        let mut v = FakeViewport { orientation: true, ..Default::default() };
        toggle_fullscreen(&mut v);
        assert!(v.locked);
    }

    #[test]
    fn lock_failure_keeps_fullscreen() {
        let mut v = FakeViewport { orientation: true, fail_lock: true, ..Default::default() };
        assert!(toggle_fullscreen(&mut v));
        assert!(!v.locked);
    }

    #[test]
    fn lock_skipped_when_unsupported() {
        let mut v = FakeViewport { fail_lock: true, ..Default::default() };
        assert!(toggle_fullscreen(&mut v));
    }
}
