impl<'i, V, S, A, D> LoggerApp<'i, V, S, A, D>
where
    V: VolumeDriver,
    S: SampleSource,
    A: AxisSource,
    D: DiagnosticSink,
{
    /// Drain the edge latches and route them by state. While a notice is
    /// pacing, edges are deliberately left latched so a press during the
    /// wait acts as soon as the menu is back.
    fn process_inputs(&mut self, now_ms: u64) {
        if matches!(self.ui, UiState::Notice { .. }) {
            return;
        }

        if self.input.poll_and_clear(ButtonId::Auxiliary) {
            // Reserved on the shipped device; drained so the latch cannot
            // hold a stale edge forever.
            debug!("input: auxiliary edge ignored");
        }

        let confirm = self.input.poll_and_clear(ButtonId::Confirm);
        let back = self.input.poll_and_clear(ButtonId::Back);
        if !confirm && !back {
            return;
        }

        match self.ui {
            UiState::Menu { .. } => {
                if confirm {
                    self.dispatch_mode(now_ms);
                }
            }
            UiState::Picker { cursor, .. } => {
                if confirm {
                    self.picker_confirm(cursor, now_ms);
                } else if back {
                    self.picker_cancel(now_ms);
                }
            }
            UiState::Capturing { .. } => {
                if confirm {
                    self.stop_capture(now_ms);
                }
            }
            UiState::Notice { .. } => {}
        }
    }

    /// One navigation step from the axis, rate-limited by `next_nav_ms`.
    fn axis_step(&mut self, now_ms: u64, next_nav_ms: u64) -> Option<AxisDirection> {
        if now_ms < next_nav_ms {
            return None;
        }
        match self.axis.read() {
            Ok(raw) => classify_axis(raw, self.config.axis_low, self.config.axis_high),
            Err(_) => {
                debug!("input: axis read failed");
                None
            }
        }
    }
}
