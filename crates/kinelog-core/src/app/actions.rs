impl<'i, V, S, A, D> LoggerApp<'i, V, S, A, D>
where
    V: VolumeDriver,
    S: SampleSource,
    A: AxisSource,
    D: DiagnosticSink,
{
    /// Confirm pressed while idling: run the action bound to the current
    /// mode.
    fn dispatch_mode(&mut self, now_ms: u64) {
        debug!("menu: confirm mode={:?}", self.mode);
        match self.mode {
            MenuMode::MountToggle => self.confirm_mount_toggle(now_ms),
            MenuMode::RecordToggle => self.start_capture(now_ms),
            MenuMode::ReadFile => self.confirm_read(now_ms),
            MenuMode::ChangeFile => self.confirm_change_file(now_ms),
            MenuMode::Maintenance => self.confirm_maintenance(now_ms),
        }
    }

    fn confirm_mount_toggle(&mut self, now_ms: u64) {
        self.emit_cue(Cue::Busy);
        if self.session.is_mounted() {
            self.enter_notice("UNMOUNTING", "SD CARD", now_ms, NoticeExit::RunUnmount);
        } else {
            self.enter_notice("MOUNTING", "SD CARD", now_ms, NoticeExit::RunMount);
        }
    }

    fn finish_mount(&mut self, now_ms: u64) {
        match self.session.mount() {
            Ok(()) => {
                self.emit_cue(Cue::Success);
                let name = self.active_name_copy();
                self.enter_notice("SD MOUNTED", name.as_str(), now_ms, NoticeExit::Menu);
            }
            Err(_) => {
                warn!("storage: mount failed");
                self.emit_cue(Cue::Failure);
                self.enter_notice("MOUNT FAILED", "CHECK CARD", now_ms, NoticeExit::Menu);
            }
        }
    }

    fn finish_unmount(&mut self, now_ms: u64) {
        match self.session.unmount() {
            Ok(()) => {
                self.emit_cue(Cue::Success);
                self.enter_notice("SD UNMOUNTED", "", now_ms, NoticeExit::Menu);
            }
            Err(_) => {
                warn!("storage: unmount failed");
                self.emit_cue(Cue::Failure);
                self.enter_notice("UNMOUNT FAILED", "CHECK CARD", now_ms, NoticeExit::Menu);
            }
        }
    }

    fn start_capture(&mut self, now_ms: u64) {
        match self.capture.start(&mut self.session) {
            Ok(()) => {
                self.emit_cue(Cue::RecordingStarted);
                self.ui = UiState::Capturing {
                    next_sample_ms: now_ms + self.config.sample_interval_ms,
                };
                self.pending_redraw = true;
            }
            Err(StorageError::NotMounted) => {
                self.emit_cue(Cue::Failure);
                self.enter_notice("SD NOT MOUNTED", "MOUNT FIRST", now_ms, NoticeExit::Menu);
            }
            Err(_) => {
                warn!("capture: could not open file");
                self.emit_cue(Cue::Failure);
                let name = self.active_name_copy();
                self.enter_notice("OPEN FAILED", name.as_str(), now_ms, NoticeExit::Menu);
            }
        }
    }

    fn stop_capture(&mut self, now_ms: u64) {
        match self.capture.stop(&mut self.session) {
            Ok(samples) => {
                info!("capture: session saved samples={samples}");
                self.emit_cue(Cue::Success);
                self.enter_notice_count("DATA SAVED", samples, now_ms, NoticeExit::Menu);
            }
            Err(_) => {
                warn!("capture: stop failed");
                self.emit_cue(Cue::Failure);
                self.enter_notice("STOP FAILED", "CHECK CARD", now_ms, NoticeExit::Menu);
            }
        }
    }

    fn confirm_read(&mut self, now_ms: u64) {
        self.emit_cue(Cue::Busy);
        if !self.session.is_mounted() {
            self.emit_cue(Cue::Failure);
            self.enter_notice("SD NOT MOUNTED", "MOUNT FIRST", now_ms, NoticeExit::Menu);
            return;
        }
        let name = self.active_name_copy();
        self.enter_notice("READING FILE", name.as_str(), now_ms, NoticeExit::RunRead);
    }

    fn finish_read(&mut self, now_ms: u64) {
        let result = self.session.read_active(&mut self.diag);
        let name = self.active_name_copy();
        match result {
            Ok(()) => {
                info!("storage: streamed {name} to diagnostics");
                self.emit_cue(Cue::Success);
                self.enter_notice("FILE READ", name.as_str(), now_ms, NoticeExit::Menu);
            }
            Err(_) => {
                warn!("storage: read failed name={name}");
                self.emit_cue(Cue::Failure);
                self.enter_notice("READ FAILED", name.as_str(), now_ms, NoticeExit::Menu);
            }
        }
    }

    fn confirm_change_file(&mut self, now_ms: u64) {
        self.emit_cue(Cue::Busy);
        if self.session.rebuild_index().is_err() {
            self.emit_cue(Cue::Failure);
            self.enter_notice("SD NOT MOUNTED", "MOUNT FIRST", now_ms, NoticeExit::Menu);
            return;
        }
        if self.session.index().is_empty() {
            self.emit_cue(Cue::Failure);
            self.enter_notice("NO CSV FOUND", "CARD EMPTY", now_ms, NoticeExit::Menu);
            return;
        }
        debug!("picker: open files={}", self.session.index().len());
        self.ui = UiState::Picker {
            cursor: 0,
            next_nav_ms: now_ms + self.config.nav_repeat_ms,
        };
        self.pending_redraw = true;
    }

    fn picker_confirm(&mut self, cursor: usize, now_ms: u64) {
        let mut selected = FileName::new();
        match self.session.index().name_at(cursor) {
            Some(name) => {
                let _ = selected.push_str(name);
            }
            None => {
                self.picker_cancel(now_ms);
                return;
            }
        }
        if self.session.select_active(selected.as_str()) {
            debug!("picker: selected {selected}");
            self.emit_cue(Cue::Success);
            self.enter_notice("FILE SELECTED", selected.as_str(), now_ms, NoticeExit::Menu);
        } else {
            self.picker_cancel(now_ms);
        }
    }

    fn picker_cancel(&mut self, now_ms: u64) {
        debug!("picker: cancelled");
        self.ui = UiState::Menu { next_nav_ms: now_ms };
        self.pending_redraw = true;
    }

    fn confirm_maintenance(&mut self, now_ms: u64) {
        self.emit_cue(Cue::Busy);
        if self.session.is_mounted() && self.session.unmount().is_err() {
            // Hand-off proceeds regardless; the bootloader re-initialises
            // the card interface anyway.
            warn!("storage: unmount before maintenance failed");
        }
        info!("maintenance: releasing control to bootloader");
        self.enter_notice(
            "MAINTENANCE MODE",
            "RELEASING CONTROL",
            now_ms,
            NoticeExit::Maintenance,
        );
    }
}
