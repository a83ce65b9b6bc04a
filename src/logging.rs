use log::Level::Trace;
use log::{log_enabled, trace};

use crate::cursor::TextCursor;
use crate::{util, LOG_TARGET};
use std::fmt::{Debug, Display};

pub(crate) trait Loggable {
    const LABEL_WIDTH: usize = 15;
    const INPUT_WIDTH: usize = 35;
    fn log_inputs<Args: Display + ?Sized>(&self, msg: &str, args: &Args);
    fn log_success_with_result<Args: Display + ?Sized, Res: Debug>(
        &self,
        msg: &str,
        args: &Args,
        res: &Res,
    );
    fn log_failure<Args: Display + ?Sized, Error: Debug>(&self, msg: &str, args: &Args, error: &Error);
}

impl<Cur> Loggable for Cur
where
    Cur: TextCursor + ?Sized,
{
    fn log_inputs<Args: Display + ?Sized>(&self, msg: &str, args: &Args) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            trace!(
                target: LOG_TARGET,
                "{inp:<iw$} {label:<lw$} : {operation}",
                iw = Self::INPUT_WIDTH,
                lw = Self::LABEL_WIDTH,
                label = msg,
                inp = util::formatter_str(self.remaining()),
                operation = args,
            );
        }
    }

    fn log_success_with_result<Args: Display + ?Sized, Res: Debug>(
        &self,
        msg: &str,
        args: &Args,
        res: &Res,
    ) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            trace!(
                target: LOG_TARGET,
                "{inp:<iw$} {label:<lw$} : {operation} -> {res:?}",
                iw = Self::INPUT_WIDTH,
                lw = Self::LABEL_WIDTH,
                label = msg,
                inp = util::formatter_str(self.remaining()),
                operation = args,
            );
        }
    }

    fn log_failure<Args: Display + ?Sized, Error: Debug>(&self, msg: &str, args: &Args, error: &Error) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            trace!(
                target: LOG_TARGET,
                "{inp:<iw$} {label:<lw$} : {operation} -> {e:?}",
                iw = Self::INPUT_WIDTH,
                lw = Self::LABEL_WIDTH,
                label = msg,
                inp = util::formatter_str(self.remaining()),
                operation = args,
                e = error,
            );
        }
    }
}
