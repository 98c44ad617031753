//! Silencing of stdout and stderr around calls into the hosting library,
//! which writes scan progress and warnings straight to the process streams.

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::io::{self, Write};
    use std::os::unix::io::{AsRawFd, RawFd};
    use std::sync::Mutex;

    const STREAMS: [RawFd; 2] = [libc::STDOUT_FILENO, libc::STDERR_FILENO];

    /// Number of live guards and the original descriptors they replaced.
    /// Only the outermost guard redirects and restores.
    static STATE: Mutex<(usize, Vec<(RawFd, RawFd)>)> = Mutex::new((0, Vec::new()));

    /// Redirects stdout and stderr to the null device until dropped.
    pub struct Silenced {
        _private: (),
    }

    impl Silenced {
        pub(crate) fn new() -> Self {
            let mut state = STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.0 += 1;
            if state.0 == 1 {
                state.1 = redirect_to_null();
            }
            Self { _private: () }
        }
    }

    fn redirect_to_null() -> Vec<(RawFd, RawFd)> {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();

        let devnull = match File::options().write(true).open("/dev/null") {
            Ok(file) => file,
            Err(_) => return Vec::new(),
        };

        let mut saved = Vec::new();
        for fd in STREAMS {
            // SAFETY: plain descriptor duplication; failures are checked
            // and leave the stream untouched.
            unsafe {
                let copy = libc::dup(fd);
                if copy < 0 {
                    continue;
                }
                if libc::dup2(devnull.as_raw_fd(), fd) < 0 {
                    libc::close(copy);
                    continue;
                }
                saved.push((fd, copy));
            }
        }
        saved
    }

    impl Drop for Silenced {
        fn drop(&mut self) {
            let mut state = STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.0 -= 1;
            if state.0 > 0 {
                return;
            }

            let _ = io::stdout().flush();
            let _ = io::stderr().flush();

            for (fd, copy) in state.1.drain(..) {
                // SAFETY: `copy` was produced by dup() and is owned here.
                unsafe {
                    libc::dup2(copy, fd);
                    libc::close(copy);
                }
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    pub struct Silenced;

    impl Silenced {
        pub(crate) fn new() -> Self {
            Silenced
        }
    }
}

pub use imp::Silenced;

/// Runs `f` with stdout and stderr silenced. The streams are restored on
/// every exit path, unwinding included.
pub fn silenced<T>(f: impl FnOnce() -> T) -> T {
    let _guard = Silenced::new();
    f()
}

/// Silences stdout and stderr for the rest of the process.
pub fn discard_remaining_output() {
    std::mem::forget(Silenced::new());
}
