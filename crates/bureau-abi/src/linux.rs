//! Linux syscall tables.

use crate::arch::AbiId;
use crate::prototype::{ArgType, SyscallPrototype};
use crate::table::{SyscallLibrary, SyscallTable};

/// Generic Linux syscall numbers (RISC-V and AArch64 ABI).
pub mod syscall_nr {
    pub const SYS_GETCWD: u64 = 17;
    pub const SYS_FCNTL: u64 = 25;
    pub const SYS_IOCTL: u64 = 29;
    pub const SYS_OPENAT: u64 = 56;
    pub const SYS_CLOSE: u64 = 57;
    pub const SYS_GETDENTS64: u64 = 61;
    pub const SYS_LSEEK: u64 = 62;
    pub const SYS_READ: u64 = 63;
    pub const SYS_WRITE: u64 = 64;
    pub const SYS_PREAD64: u64 = 67;
    pub const SYS_FSTAT: u64 = 80;
    pub const SYS_EXIT: u64 = 93;
    pub const SYS_EXIT_GROUP: u64 = 94;
    pub const SYS_SET_TID_ADDRESS: u64 = 96;
    pub const SYS_CLOCK_GETTIME: u64 = 113;
    pub const SYS_SCHED_SETSCHEDULER: u64 = 119;
    pub const SYS_SCHED_GETSCHEDULER: u64 = 120;
    pub const SYS_SCHED_GETPARAM: u64 = 121;
    pub const SYS_SCHED_GET_PRIORITY_MAX: u64 = 125;
    pub const SYS_SCHED_GET_PRIORITY_MIN: u64 = 126;
    pub const SYS_TGKILL: u64 = 131;
    pub const SYS_UNAME: u64 = 160;
    pub const SYS_GETPID: u64 = 172;
    pub const SYS_GETUID: u64 = 174;
    pub const SYS_GETEUID: u64 = 175;
    pub const SYS_GETGID: u64 = 176;
    pub const SYS_GETEGID: u64 = 177;
    pub const SYS_GETTID: u64 = 178;
    pub const SYS_SYSINFO: u64 = 179;
    pub const SYS_SOCKET: u64 = 198;
    pub const SYS_CONNECT: u64 = 203;
    pub const SYS_BRK: u64 = 214;
    pub const SYS_MUNMAP: u64 = 215;
    pub const SYS_MREMAP: u64 = 216;
    pub const SYS_MMAP: u64 = 222;
    pub const SYS_MPROTECT: u64 = 226;
    pub const SYS_MADVISE: u64 = 233;
    pub const SYS_RISCV_HWPROBE: u64 = 258;
    pub const SYS_PRLIMIT64: u64 = 261;
    pub const SYS_GETRANDOM: u64 = 278;
    pub const SYS_RSEQ: u64 = 293;
}

use ArgType::{CStr, Int, Long, Pointer, SizeT, UInt, ULong};

/// Prototypes shared by every Linux ABI.
const LINUX_PROTOTYPES: &[(&str, &[ArgType], ArgType)] = &[
    ("read", &[Int, Pointer, SizeT], Long),
    ("write", &[Int, Pointer, SizeT], Long),
    ("open", &[CStr, Int, UInt], Int),
    ("openat", &[Int, CStr, Int, UInt], Int),
    ("close", &[Int], Int),
    ("stat", &[CStr, Pointer], Int),
    ("fstat", &[Int, Pointer], Int),
    ("lstat", &[CStr, Pointer], Int),
    ("poll", &[Pointer, UInt, Int], Int),
    ("lseek", &[Int, Long, Int], Long),
    ("mmap", &[Pointer, SizeT, Int, Int, Int, Long], Pointer),
    ("mmap2", &[Pointer, SizeT, Int, Int, Int, ULong], Pointer),
    ("mprotect", &[Pointer, SizeT, Int], Int),
    ("munmap", &[Pointer, SizeT], Int),
    ("mremap", &[Pointer, SizeT, SizeT, Int, Pointer], Pointer),
    ("madvise", &[Pointer, SizeT, Int], Int),
    ("brk", &[Pointer], Pointer),
    ("ioctl", &[Int, ULong, ULong], Int),
    ("pread64", &[Int, Pointer, SizeT, Long], Long),
    ("access", &[CStr, Int], Int),
    ("pipe", &[Pointer], Int),
    ("dup", &[Int], Int),
    ("dup2", &[Int, Int], Int),
    ("getpid", &[], Int),
    ("gettid", &[], Int),
    ("getuid", &[], UInt),
    ("getgid", &[], UInt),
    ("geteuid", &[], UInt),
    ("getegid", &[], UInt),
    ("socket", &[Int, Int, Int], Int),
    ("connect", &[Int, Pointer, UInt], Int),
    ("exit", &[Int], Int),
    ("exit_group", &[Int], Int),
    ("uname", &[Pointer], Int),
    ("fcntl", &[Int, Int, ULong], Int),
    ("getcwd", &[Pointer, SizeT], Long),
    ("chdir", &[CStr], Int),
    ("mkdir", &[CStr, UInt], Int),
    ("rmdir", &[CStr], Int),
    ("unlink", &[CStr], Int),
    ("readlink", &[CStr, Pointer, SizeT], Long),
    ("gettimeofday", &[Pointer, Pointer], Int),
    ("sysinfo", &[Pointer], Int),
    ("arch_prctl", &[Int, ULong], Int),
    ("time", &[Pointer], Long),
    ("set_tid_address", &[Pointer], Long),
    ("set_thread_area", &[Pointer], Int),
    ("clock_gettime", &[Int, Pointer], Int),
    ("getdents64", &[Int, Pointer, UInt], Long),
    ("tgkill", &[Int, Int, Int], Int),
    ("prlimit64", &[Int, UInt, Pointer, Pointer], Int),
    ("getrandom", &[Pointer, SizeT, UInt], Long),
    ("rseq", &[Pointer, UInt, Int, UInt], Int),
    ("riscv_hwprobe", &[Pointer, SizeT, SizeT, Pointer, UInt], Int),
    ("sched_setscheduler", &[Int, Int, Pointer], Int),
    ("sched_getscheduler", &[Int], Int),
    ("sched_getparam", &[Int, Pointer], Int),
    ("sched_get_priority_max", &[Int], Int),
    ("sched_get_priority_min", &[Int], Int),
];

const AMD64_NUMBERS: &[(u64, &str)] = &[
    (0, "read"),
    (1, "write"),
    (2, "open"),
    (3, "close"),
    (4, "stat"),
    (5, "fstat"),
    (6, "lstat"),
    (7, "poll"),
    (8, "lseek"),
    (9, "mmap"),
    (10, "mprotect"),
    (11, "munmap"),
    (12, "brk"),
    (16, "ioctl"),
    (17, "pread64"),
    (21, "access"),
    (22, "pipe"),
    (25, "mremap"),
    (28, "madvise"),
    (32, "dup"),
    (33, "dup2"),
    (39, "getpid"),
    (41, "socket"),
    (42, "connect"),
    (60, "exit"),
    (63, "uname"),
    (72, "fcntl"),
    (79, "getcwd"),
    (80, "chdir"),
    (83, "mkdir"),
    (84, "rmdir"),
    (87, "unlink"),
    (89, "readlink"),
    (96, "gettimeofday"),
    (99, "sysinfo"),
    (102, "getuid"),
    (104, "getgid"),
    (107, "geteuid"),
    (108, "getegid"),
    (158, "arch_prctl"),
    (186, "gettid"),
    (201, "time"),
    (217, "getdents64"),
    (218, "set_tid_address"),
    (228, "clock_gettime"),
    (231, "exit_group"),
    (234, "tgkill"),
    (257, "openat"),
    (302, "prlimit64"),
    (318, "getrandom"),
    (334, "rseq"),
];

const I386_NUMBERS: &[(u64, &str)] = &[
    (1, "exit"),
    (3, "read"),
    (4, "write"),
    (5, "open"),
    (6, "close"),
    (10, "unlink"),
    (12, "chdir"),
    (13, "time"),
    (19, "lseek"),
    (20, "getpid"),
    (24, "getuid"),
    (33, "access"),
    (39, "mkdir"),
    (40, "rmdir"),
    (41, "dup"),
    (42, "pipe"),
    (45, "brk"),
    (47, "getgid"),
    (49, "geteuid"),
    (50, "getegid"),
    (54, "ioctl"),
    (55, "fcntl"),
    (63, "dup2"),
    (78, "gettimeofday"),
    (85, "readlink"),
    (90, "mmap"),
    (91, "munmap"),
    (106, "stat"),
    (107, "lstat"),
    (108, "fstat"),
    (116, "sysinfo"),
    (122, "uname"),
    (125, "mprotect"),
    (163, "mremap"),
    (168, "poll"),
    (180, "pread64"),
    (183, "getcwd"),
    (192, "mmap2"),
    (219, "madvise"),
    (220, "getdents64"),
    (224, "gettid"),
    (243, "set_thread_area"),
    (252, "exit_group"),
    (258, "set_tid_address"),
    (265, "clock_gettime"),
    (270, "tgkill"),
    (295, "openat"),
    (355, "getrandom"),
];

const MIPS_O32_NUMBERS: &[(u64, &str)] = &[
    (4001, "exit"),
    (4003, "read"),
    (4004, "write"),
    (4005, "open"),
    (4006, "close"),
    (4010, "unlink"),
    (4012, "chdir"),
    (4013, "time"),
    (4019, "lseek"),
    (4020, "getpid"),
    (4024, "getuid"),
    (4033, "access"),
    (4039, "mkdir"),
    (4040, "rmdir"),
    (4041, "dup"),
    (4042, "pipe"),
    (4045, "brk"),
    (4047, "getgid"),
    (4049, "geteuid"),
    (4050, "getegid"),
    (4054, "ioctl"),
    (4055, "fcntl"),
    (4063, "dup2"),
    (4078, "gettimeofday"),
    (4085, "readlink"),
    (4090, "mmap"),
    (4091, "munmap"),
    (4106, "stat"),
    (4107, "lstat"),
    (4108, "fstat"),
    (4122, "uname"),
    (4125, "mprotect"),
    (4167, "mremap"),
    (4188, "poll"),
    (4200, "pread64"),
    (4203, "getcwd"),
    (4210, "mmap2"),
    (4219, "getdents64"),
    (4222, "gettid"),
    (4246, "exit_group"),
    (4252, "set_tid_address"),
    (4263, "clock_gettime"),
    (4266, "tgkill"),
    (4283, "set_thread_area"),
    (4288, "openat"),
    (4353, "getrandom"),
];

const MIPS_N64_NUMBERS: &[(u64, &str)] = &[
    (5000, "read"),
    (5001, "write"),
    (5002, "open"),
    (5003, "close"),
    (5004, "stat"),
    (5005, "fstat"),
    (5006, "lstat"),
    (5007, "poll"),
    (5008, "lseek"),
    (5009, "mmap"),
    (5010, "mprotect"),
    (5011, "munmap"),
    (5012, "brk"),
    (5015, "ioctl"),
    (5016, "pread64"),
    (5020, "access"),
    (5021, "pipe"),
    (5024, "mremap"),
    (5027, "madvise"),
    (5031, "dup"),
    (5032, "dup2"),
    (5038, "getpid"),
    (5040, "socket"),
    (5041, "connect"),
    (5058, "exit"),
    (5061, "uname"),
    (5070, "fcntl"),
    (5077, "getcwd"),
    (5078, "chdir"),
    (5081, "mkdir"),
    (5082, "rmdir"),
    (5085, "unlink"),
    (5087, "readlink"),
    (5094, "gettimeofday"),
    (5100, "getuid"),
    (5102, "getgid"),
    (5105, "geteuid"),
    (5106, "getegid"),
    (5178, "gettid"),
    (5205, "exit_group"),
    (5212, "set_tid_address"),
    (5222, "clock_gettime"),
    (5225, "tgkill"),
    (5242, "set_thread_area"),
    (5247, "openat"),
    (5308, "getdents64"),
    (5313, "getrandom"),
];

const MIPS_N32_NUMBERS: &[(u64, &str)] = &[
    (6000, "read"),
    (6001, "write"),
    (6002, "open"),
    (6003, "close"),
    (6004, "stat"),
    (6005, "fstat"),
    (6006, "lstat"),
    (6007, "poll"),
    (6008, "lseek"),
    (6009, "mmap"),
    (6010, "mprotect"),
    (6011, "munmap"),
    (6012, "brk"),
    (6015, "ioctl"),
    (6016, "pread64"),
    (6020, "access"),
    (6021, "pipe"),
    (6024, "mremap"),
    (6027, "madvise"),
    (6031, "dup"),
    (6032, "dup2"),
    (6038, "getpid"),
    (6040, "socket"),
    (6041, "connect"),
    (6058, "exit"),
    (6061, "uname"),
    (6070, "fcntl"),
    (6077, "getcwd"),
    (6078, "chdir"),
    (6081, "mkdir"),
    (6082, "rmdir"),
    (6085, "unlink"),
    (6087, "readlink"),
    (6094, "gettimeofday"),
    (6100, "getuid"),
    (6102, "getgid"),
    (6105, "geteuid"),
    (6106, "getegid"),
    (6178, "gettid"),
    (6205, "exit_group"),
    (6213, "set_tid_address"),
    (6226, "clock_gettime"),
    (6229, "tgkill"),
    (6246, "set_thread_area"),
    (6251, "openat"),
    (6299, "getdents64"),
    (6317, "getrandom"),
];

/// Numbering shared by the generic-ABI architectures.
fn generic_numbers() -> Vec<(u64, &'static str)> {
    use syscall_nr::{
        SYS_BRK, SYS_CLOCK_GETTIME, SYS_CLOSE, SYS_CONNECT, SYS_EXIT, SYS_EXIT_GROUP, SYS_FCNTL,
        SYS_FSTAT, SYS_GETCWD, SYS_GETDENTS64, SYS_GETEGID, SYS_GETEUID, SYS_GETGID, SYS_GETPID,
        SYS_GETRANDOM, SYS_GETTID, SYS_GETUID, SYS_IOCTL, SYS_LSEEK, SYS_MADVISE, SYS_MMAP,
        SYS_MPROTECT, SYS_MREMAP, SYS_MUNMAP, SYS_OPENAT, SYS_PREAD64, SYS_PRLIMIT64, SYS_READ,
        SYS_RSEQ, SYS_SCHED_GET_PRIORITY_MAX, SYS_SCHED_GET_PRIORITY_MIN, SYS_SCHED_GETPARAM,
        SYS_SCHED_GETSCHEDULER, SYS_SCHED_SETSCHEDULER, SYS_SET_TID_ADDRESS, SYS_SOCKET,
        SYS_SYSINFO, SYS_TGKILL, SYS_UNAME, SYS_WRITE,
    };
    vec![
        (SYS_GETCWD, "getcwd"),
        (SYS_FCNTL, "fcntl"),
        (SYS_IOCTL, "ioctl"),
        (SYS_OPENAT, "openat"),
        (SYS_CLOSE, "close"),
        (SYS_GETDENTS64, "getdents64"),
        (SYS_LSEEK, "lseek"),
        (SYS_READ, "read"),
        (SYS_WRITE, "write"),
        (SYS_PREAD64, "pread64"),
        (SYS_FSTAT, "fstat"),
        (SYS_EXIT, "exit"),
        (SYS_EXIT_GROUP, "exit_group"),
        (SYS_SET_TID_ADDRESS, "set_tid_address"),
        (SYS_CLOCK_GETTIME, "clock_gettime"),
        (SYS_SCHED_SETSCHEDULER, "sched_setscheduler"),
        (SYS_SCHED_GETSCHEDULER, "sched_getscheduler"),
        (SYS_SCHED_GETPARAM, "sched_getparam"),
        (SYS_SCHED_GET_PRIORITY_MAX, "sched_get_priority_max"),
        (SYS_SCHED_GET_PRIORITY_MIN, "sched_get_priority_min"),
        (SYS_TGKILL, "tgkill"),
        (SYS_UNAME, "uname"),
        (SYS_GETPID, "getpid"),
        (SYS_GETUID, "getuid"),
        (SYS_GETEUID, "geteuid"),
        (SYS_GETGID, "getgid"),
        (SYS_GETEGID, "getegid"),
        (SYS_GETTID, "gettid"),
        (SYS_SYSINFO, "sysinfo"),
        (SYS_SOCKET, "socket"),
        (SYS_CONNECT, "connect"),
        (SYS_BRK, "brk"),
        (SYS_MUNMAP, "munmap"),
        (SYS_MREMAP, "mremap"),
        (SYS_MMAP, "mmap"),
        (SYS_MPROTECT, "mprotect"),
        (SYS_MADVISE, "madvise"),
        (SYS_PRLIMIT64, "prlimit64"),
        (SYS_GETRANDOM, "getrandom"),
        (SYS_RSEQ, "rseq"),
    ]
}

fn linux_prototype(name: &str) -> Option<SyscallPrototype> {
    LINUX_PROTOTYPES
        .iter()
        .find(|(proto_name, _, _)| *proto_name == name)
        .map(|&(proto_name, args, ret)| SyscallPrototype::new(proto_name, args, ret))
}

fn linux_table(abi: AbiId, numbers: &[(u64, &'static str)]) -> SyscallTable {
    let mut table = SyscallTable::new(abi);
    for &(num, name) in numbers {
        table = table.with_number(num, name);
        if let Some(prototype) = linux_prototype(name) {
            table = table.with_prototype(prototype);
        }
    }
    table
}

impl SyscallLibrary {
    /// Linux tables for every supported ABI.
    #[must_use]
    pub fn linux() -> Self {
        let mut riscv = generic_numbers();
        riscv.push((syscall_nr::SYS_RISCV_HWPROBE, "riscv_hwprobe"));

        Self::new()
            .with_table(linux_table(AbiId::AMD64, AMD64_NUMBERS))
            .with_table(linux_table(AbiId::I386, I386_NUMBERS))
            .with_table(linux_table(AbiId::MIPS_O32, MIPS_O32_NUMBERS))
            .with_table(linux_table(AbiId::MIPS_N64, MIPS_N64_NUMBERS))
            .with_table(linux_table(AbiId::MIPS_N32, MIPS_N32_NUMBERS))
            .with_table(linux_table(AbiId::RISCV64, &riscv))
            .with_table(linux_table(AbiId::AARCH64, &generic_numbers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SyscallCatalog;

    #[test]
    fn test_every_numbered_syscall_has_a_prototype() {
        let lib = SyscallLibrary::linux();
        for abi in lib.abis() {
            let table = lib.table(abi).unwrap();
            for (num, name) in table.entries() {
                assert!(
                    table.prototype(name).is_some(),
                    "{abi}: syscall {num} ({name}) has no prototype"
                );
            }
        }
    }

    #[test]
    fn test_amd64_open() {
        let lib = SyscallLibrary::linux();
        assert_eq!(lib.syscall_name(&AbiId::AMD64, 2), Some("open"));
        let proto = lib.prototype(&AbiId::AMD64, "open").unwrap();
        assert_eq!(proto.arg_count(), 3);
    }

    #[test]
    fn test_mips_numbering_is_offset() {
        let lib = SyscallLibrary::linux();
        assert_eq!(lib.syscall_name(&AbiId::MIPS_O32, 4004), Some("write"));
        assert_eq!(lib.syscall_name(&AbiId::MIPS_N64, 5001), Some("write"));
        assert_eq!(lib.syscall_name(&AbiId::MIPS_N32, 6001), Some("write"));
        assert_eq!(lib.syscall_name(&AbiId::MIPS_N64, 4004), None);
    }

    #[test]
    fn test_generic_numbering_shared() {
        let lib = SyscallLibrary::linux();
        for abi in [AbiId::RISCV64, AbiId::AARCH64] {
            assert_eq!(lib.syscall_name(&abi, syscall_nr::SYS_WRITE), Some("write"));
            assert_eq!(
                lib.syscall_name(&abi, syscall_nr::SYS_OPENAT),
                Some("openat")
            );
        }
        assert_eq!(
            lib.syscall_name(&AbiId::AARCH64, syscall_nr::SYS_RISCV_HWPROBE),
            None
        );
    }

    #[test]
    fn test_reverse_lookup() {
        let lib = SyscallLibrary::linux();
        let table = lib.table(&AbiId::I386).unwrap();
        assert_eq!(table.number("exit_group"), Some(252));
    }
}
