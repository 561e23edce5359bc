impl<'i, V, S, A, D> LoggerApp<'i, V, S, A, D>
where
    V: VolumeDriver,
    S: SampleSource,
    A: AxisSource,
    D: DiagnosticSink,
{
    /// Build the device context. The app boots into a paced startup notice
    /// and settles on the first menu mode.
    pub fn new(
        volume: V,
        sensor: S,
        axis: A,
        diag: D,
        input: &'i InputController,
        config: LoggerConfig,
        now_ms: u64,
    ) -> Self {
        let mut app = Self {
            session: StorageSession::new(volume),
            capture: CaptureLoop::new(),
            sensor,
            axis,
            diag,
            input,
            config,
            mode: MenuMode::MountToggle,
            ui: UiState::Menu { next_nav_ms: now_ms },
            pending_redraw: true,
            pending_cue: None,
            notice_detail: FileName::new(),
        };
        app.emit_cue(Cue::Startup);
        app.enter_notice("STARTING", "", now_ms, NoticeExit::Menu);
        app
    }

    pub fn menu_mode(&self) -> MenuMode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_mounted()
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    pub fn session(&self) -> &StorageSession<V> {
        &self.session
    }

    /// Latest audio/visual cue, if a transition produced one since the last
    /// drain. The platform layer maps it onto the LED and buzzer drivers.
    pub fn take_cue(&mut self) -> Option<Cue> {
        self.pending_cue.take()
    }

    /// Run the view model for the current state through `f`.
    pub fn with_screen<F>(&self, f: F)
    where
        F: FnOnce(Screen<'_>),
    {
        match self.ui {
            UiState::Menu { .. } => f(Screen::Menu {
                mode: self.mode,
                mounted: self.session.is_mounted(),
                active_file: self.session.active_name(),
            }),
            UiState::Picker { cursor, .. } => f(Screen::Picker {
                name: self.session.index().name_at(cursor).unwrap_or(""),
                index: cursor,
                total: self.session.index().len(),
            }),
            UiState::Capturing { .. } => f(Screen::Capturing {
                filename: self.session.active_name(),
                samples: self.capture.sample_count(),
            }),
            UiState::Notice { line1, .. } => f(Screen::Notice {
                line1,
                detail: self.notice_detail.as_str(),
            }),
        }
    }

    fn emit_cue(&mut self, cue: Cue) {
        self.pending_cue = Some(cue);
    }

    /// Show `line1`/`detail` until the notice deadline, then continue at
    /// `exit`.
    fn enter_notice(&mut self, line1: &'static str, detail: &str, now_ms: u64, exit: NoticeExit) {
        self.notice_detail.clear();
        let _ = self.notice_detail.push_str(detail);
        self.ui = UiState::Notice {
            line1,
            until_ms: now_ms + self.config.notice_ms,
            exit,
        };
        self.pending_redraw = true;
    }

    /// Notice whose detail line reports a sample count.
    fn enter_notice_count(
        &mut self,
        line1: &'static str,
        samples: u32,
        now_ms: u64,
        exit: NoticeExit,
    ) {
        let mut detail = FileName::new();
        let _ = write!(detail, "SAMPLES: {samples}");
        self.enter_notice(line1, detail.as_str(), now_ms, exit);
    }

    /// Owned copy of the active filename, for notices that outlive borrows.
    fn active_name_copy(&self) -> FileName {
        let mut name = FileName::new();
        let _ = name.push_str(self.session.active_name());
        name
    }

    fn take_redraw(&mut self) -> TickResult {
        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }
}
