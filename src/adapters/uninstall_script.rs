//! Real Time Response `runscript` commands that remove the sensor on each platform.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// Maps the `platform_name` reported by the devices API.
    pub fn from_platform_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => Some(Self::Windows),
            "mac" => Some(Self::Mac),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Linux sensors are removed through the package manager without a maintenance token.
    pub fn needs_maintenance_token(self) -> bool {
        !matches!(self, Self::Linux)
    }
}

const WINDOWS_SCRIPT: &str = concat!(
    "$Key = Get-ChildItem 'HKLM:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Uninstall',",
    "'HKLM:\\SOFTWARE\\WOW6432Node\\Microsoft\\Windows\\CurrentVersion\\Uninstall' | ",
    "Get-ItemProperty | Where-Object { $_.DisplayName -eq 'CrowdStrike Sensor Platform' }; ",
    "if ($Key) { $Arg = '/X{0} /qn MAINTENANCE_TOKEN={1} REBOOT=ReallySuppress' -f $Key.PSChildName, '@TOKEN@'; ",
    "Start-Process -FilePath msiexec.exe -ArgumentList $Arg -PassThru | Select-Object -ExpandProperty Id } ",
    "else { Write-Error 'CrowdStrike Sensor Platform not found' }"
);

const MAC_SCRIPT: &str =
    "echo '@TOKEN@' | /Applications/Falcon.app/Contents/Resources/falconctl uninstall --maintenance-token";

const LINUX_SCRIPT: &str = concat!(
    "if command -v dpkg >/dev/null 2>&1 && dpkg -s falcon-sensor >/dev/null 2>&1; ",
    "then dpkg -P falcon-sensor; ",
    "else rpm -e --nodeps falcon-sensor; fi"
);

/// Builds the full `command_string` for an admin `runscript` command.
pub fn runscript_command(platform: Platform, maintenance_token: Option<&str>) -> String {
    let token = maintenance_token.unwrap_or_default();
    let script = match platform {
        Platform::Windows => WINDOWS_SCRIPT.replace("@TOKEN@", token),
        Platform::Mac => MAC_SCRIPT.replace("@TOKEN@", token),
        Platform::Linux => LINUX_SCRIPT.to_string(),
    };
    format!("runscript -Raw=```{}```", script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::from_platform_name("Windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_platform_name("Mac"), Some(Platform::Mac));
        assert_eq!(Platform::from_platform_name(" linux "), Some(Platform::Linux));
        assert_eq!(Platform::from_platform_name("ChromeOS"), None);
    }

    #[test]
    fn test_windows_command_embeds_token() {
        let cmd = runscript_command(Platform::Windows, Some("tok-123"));
        assert!(cmd.starts_with("runscript -Raw=```"));
        assert!(cmd.ends_with("```"));
        assert!(cmd.contains("MAINTENANCE_TOKEN={1}"));
        assert!(cmd.contains("'tok-123'"));
        assert!(!cmd.contains("@TOKEN@"));
    }

    #[test]
    fn test_linux_command_ignores_token() {
        let cmd = runscript_command(Platform::Linux, None);
        assert!(cmd.contains("falcon-sensor"));
        assert!(!Platform::Linux.needs_maintenance_token());
    }
}
