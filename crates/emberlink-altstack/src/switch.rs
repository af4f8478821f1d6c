//! The execution-context switch primitive.
//!
//! This module is the crate's single `unsafe` boundary. The save, swap and
//! restore of the stack pointer happen inside one inline-asm sequence, so
//! there is no window in which another observer could see a half-switched
//! context; everything above this module is safe code.
//!
//! The proxied call must never unwind across the switch: the trampoline
//! catches any panic on the alternate stack and the caller re-raises it
//! after the primary stack pointer is back in place.

use core::any::Any;
use core::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

pub(crate) type CallResult<R> = Result<R, Box<dyn Any + Send + 'static>>;

struct Call<F, R> {
    f: Option<F>,
    out: Option<CallResult<R>>,
}

/// Run `f` with its stack frames allocated from the region ending at `top`.
///
/// # Safety
///
/// `top` must be 16-byte aligned and point one past the end of a writable
/// region that stays exclusively borrowed for the duration of the call and
/// is large enough for the call's deepest frame chain. Overflowing the
/// region is undefined behavior by nature; the caller is responsible for
/// sizing (see the crate-level guard and canary machinery).
pub(crate) unsafe fn on_stack<F, R>(top: *mut u8, f: F) -> CallResult<R>
where
    F: FnOnce() -> R,
{
    unsafe extern "C" fn trampoline<F, R>(raw: *mut c_void)
    where
        F: FnOnce() -> R,
    {
        let call = &mut *(raw as *mut Call<F, R>);
        let f = call.f.take().expect("trampoline entered twice");
        call.out = Some(panic::catch_unwind(AssertUnwindSafe(f)));
    }

    let mut call = Call::<F, R> { f: Some(f), out: None };
    switch_and_call(
        top,
        trampoline::<F, R>,
        &mut call as *mut Call<F, R> as *mut c_void,
    );
    call.out.take().expect("proxied call did not run")
}

#[cfg(all(target_arch = "x86_64", target_family = "unix"))]
unsafe fn switch_and_call(
    top: *mut u8,
    entry: unsafe extern "C" fn(*mut c_void),
    arg: *mut c_void,
) {
    // `tmp` starts as the new top-of-stack and holds the saved primary stack
    // pointer across the call; the register allocator keeps operands in
    // callee-saved registers because of the abi clobber.
    core::arch::asm!(
        "xchg rsp, r12",
        "call {entry}",
        "mov rsp, r12",
        inout("r12") top => _,
        entry = in(reg) entry,
        in("rdi") arg,
        clobber_abi("sysv64"),
    );
}

#[cfg(all(target_arch = "aarch64", target_family = "unix"))]
unsafe fn switch_and_call(
    top: *mut u8,
    entry: unsafe extern "C" fn(*mut c_void),
    arg: *mut c_void,
) {
    core::arch::asm!(
        "mov {tmp}, sp",
        "mov sp, {top}",
        "blr {entry}",
        "mov sp, {tmp}",
        tmp = out(reg) _,
        top = in(reg) top,
        entry = in(reg) entry,
        in("x0") arg,
        clobber_abi("C"),
    );
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_family = "unix"),
    all(target_arch = "aarch64", target_family = "unix"),
)))]
compile_error!("alternate-stack switching is implemented for x86_64 and aarch64 unix targets only");
