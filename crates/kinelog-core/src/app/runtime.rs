impl<'i, V, S, A, D> LoggerApp<'i, V, S, A, D>
where
    V: VolumeDriver,
    S: SampleSource,
    A: AxisSource,
    D: DiagnosticSink,
{
    /// One cooperative main-loop iteration.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);

        match self.ui {
            UiState::Menu { .. } => self.tick_menu(now_ms),
            UiState::Picker { .. } => self.tick_picker(now_ms),
            UiState::Capturing { .. } => self.tick_capture(now_ms),
            UiState::Notice { .. } => self.tick_notice(now_ms),
        }
    }

    fn tick_menu(&mut self, now_ms: u64) -> TickResult {
        if let UiState::Menu { next_nav_ms } = self.ui
            && let Some(direction) = self.axis_step(now_ms, next_nav_ms)
        {
            self.mode = match direction {
                AxisDirection::Previous => self.mode.prev(),
                AxisDirection::Next => self.mode.next(),
            };
            debug!("menu: mode={:?}", self.mode);
            self.ui = UiState::Menu {
                next_nav_ms: now_ms + self.config.nav_repeat_ms,
            };
            self.pending_redraw = true;
        }
        self.take_redraw()
    }

    fn tick_picker(&mut self, now_ms: u64) -> TickResult {
        if let UiState::Picker { cursor, next_nav_ms } = self.ui
            && let Some(direction) = self.axis_step(now_ms, next_nav_ms)
        {
            let total = self.session.index().len().max(1);
            let cursor = match direction {
                AxisDirection::Previous => (cursor + total - 1) % total,
                AxisDirection::Next => (cursor + 1) % total,
            };
            debug!("picker: cursor={}/{}", cursor + 1, total);
            self.ui = UiState::Picker {
                cursor,
                next_nav_ms: now_ms + self.config.nav_repeat_ms,
            };
            self.pending_redraw = true;
        }
        self.take_redraw()
    }

    fn tick_capture(&mut self, now_ms: u64) -> TickResult {
        let UiState::Capturing { next_sample_ms } = self.ui else {
            return self.take_redraw();
        };
        if now_ms < next_sample_ms {
            return self.take_redraw();
        }

        match self.capture.tick(&mut self.session, &mut self.sensor) {
            Ok(samples) => {
                debug!("capture: sample={samples}");
                self.ui = UiState::Capturing {
                    next_sample_ms: next_sample_ms + self.config.sample_interval_ms,
                };
                self.pending_redraw = true;
            }
            Err(_) => {
                // A tick that cannot persist ends the session; whatever was
                // flushed before the fault stays on the card.
                warn!("capture: tick failed, aborting session");
                let samples = self.capture.abort(&mut self.session);
                self.emit_cue(Cue::Failure);
                self.enter_notice_count("CAPTURE FAILED", samples, now_ms, NoticeExit::Menu);
            }
        }
        self.take_redraw()
    }

    fn tick_notice(&mut self, now_ms: u64) -> TickResult {
        let UiState::Notice {
            until_ms, exit, ..
        } = self.ui
        else {
            return self.take_redraw();
        };
        if now_ms < until_ms {
            return self.take_redraw();
        }

        match exit {
            NoticeExit::Menu => {
                self.ui = UiState::Menu { next_nav_ms: now_ms };
                self.pending_redraw = true;
            }
            NoticeExit::RunMount => self.finish_mount(now_ms),
            NoticeExit::RunUnmount => self.finish_unmount(now_ms),
            NoticeExit::RunRead => self.finish_read(now_ms),
            NoticeExit::Maintenance => return TickResult::EnterMaintenance,
        }
        self.take_redraw()
    }
}
